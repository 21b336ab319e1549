use chrono::NaiveDate;
use prsa_processor::analyzers::AirQualityAnalyzer;
use prsa_processor::models::{Pollutant, Variable};
use prsa_processor::processors::BatchProcessor;
use prsa_processor::ProcessingError;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

const HEADER: &str =
    "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

fn write_station(dir: &TempDir, station: &str, rows: &[String]) {
    let path = dir
        .path()
        .join(format!("PRSA_Data_{}_20130301-20170228.csv", station));
    let mut file = File::create(&path).expect("Failed to create station file");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
}

/// A month of hourly rows with a sprinkling of missing values, one duplicated
/// row and one extreme PM2.5 spike.
fn fixture_rows(station: &str, year: i32) -> Vec<String> {
    let mut rows = Vec::new();
    for day in 1..=28 {
        for hour in 0..24 {
            let pm25 = if (day + hour) % 17 == 0 {
                "NA".to_string()
            } else {
                format!("{}", 20 + ((day * 3 + hour) % 40))
            };
            let wd = if hour % 11 == 0 { "NA" } else { "NNW" };
            let temp = -5.0 + day as f64 * 0.3 + hour as f64 * 0.2;
            rows.push(format!(
                "1,{},3,{},{},{},34,5,21,400,55,{:.1},1021.3,-12.2,0,{},2.1,{}",
                year, day, hour, pm25, temp, wd, station
            ));
        }
    }
    // Exact duplicate of the first row
    rows.push(rows[0].clone());
    // Extreme spike, far outside the IQR bounds
    rows.push(format!(
        "1,{},3,28,23,900,34,5,21,400,55,2.1,1021.3,-12.2,0,NNW,2.1,{}",
        year, station
    ));
    rows
}

#[test]
fn test_full_pipeline_invariants() {
    let dir = TempDir::new().unwrap();
    write_station(&dir, "Aotizhongxin", &fixture_rows("Aotizhongxin", 2013));
    write_station(&dir, "Changping", &fixture_rows("Changping", 2013));

    let processor = BatchProcessor::new().with_assessment(true);
    let report = processor.process_directory(dir.path(), None).unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);

    // The raw assessment saw the problems the cleaner is about to fix
    let assessment = &report.assessments[0];
    assert!(assessment.duplicate_rows >= 1);
    let pm25_column = assessment
        .columns
        .iter()
        .find(|c| c.column == "PM2.5")
        .unwrap();
    assert!(pm25_column.missing > 0);

    for cleaned in report.cleaned.values() {
        // No duplicate rows remain
        let keys: HashSet<_> = cleaned.records.iter().map(|r| r.row_key()).collect();
        assert_eq!(keys.len(), cleaned.len());

        // A second outlier pass over the cleaned column flags nothing
        let values: Vec<f64> = cleaned.records.iter().map(|r| r.pm25).collect();
        let q1 = prsa_processor::utils::quantile(&values, 0.25).unwrap();
        let q3 = prsa_processor::utils::quantile(&values, 0.75).unwrap();
        let iqr = q3 - q1;
        let (lower, upper) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        assert!(values.iter().all(|v| *v >= lower && *v <= upper));

        // The 900 spike was clipped away entirely
        assert!(values.iter().all(|v| *v < 900.0));
    }
}

#[test]
fn test_monthly_report_over_cleaned_output() {
    let dir = TempDir::new().unwrap();
    write_station(&dir, "Aotizhongxin", &fixture_rows("Aotizhongxin", 2013));

    let report = BatchProcessor::new()
        .process_directory(dir.path(), None)
        .unwrap();

    let analyzer = AirQualityAnalyzer::new();
    let monthly = analyzer.monthly_averages(&report.cleaned, "PM2.5").unwrap();

    assert_eq!(monthly.pollutant, Pollutant::Pm25);
    assert_eq!(monthly.series.len(), 1);
    assert_eq!(monthly.series[0].points.len(), 1); // one calendar month
    assert_eq!(monthly.peak_year, 2013);

    // A fake pollutant is rejected up front
    let err = analyzer.monthly_averages(&report.cleaned, "CO2").unwrap_err();
    assert!(matches!(err, ProcessingError::Validation(_)));
}

#[test]
fn test_correlation_over_cleaned_output() {
    let dir = TempDir::new().unwrap();
    write_station(&dir, "Wanliu", &fixture_rows("Wanliu", 2015));

    let report = BatchProcessor::new()
        .process_directory(dir.path(), None)
        .unwrap();

    let analyzer = AirQualityAnalyzer::new();
    let period = (
        NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2015, 3, 15).unwrap(),
    );
    let correlation = analyzer
        .correlation(
            &report.cleaned,
            "Wanliu",
            Variable::Temp,
            Variable::Pollutant(Pollutant::Pm25),
            Some(period),
        )
        .unwrap();

    assert_eq!(correlation.pairs, 14 * 24);
    assert!(correlation.coefficient.abs() <= 1.0);

    // The station must be named explicitly; an unknown one is an error
    assert!(analyzer
        .correlation(
            &report.cleaned,
            "Dingling",
            Variable::Temp,
            Variable::Pollutant(Pollutant::Pm25),
            None,
        )
        .is_err());
}

#[test]
fn test_schema_mismatch_fails_station_but_not_batch() {
    let dir = TempDir::new().unwrap();
    write_station(&dir, "Aotizhongxin", &fixture_rows("Aotizhongxin", 2013));

    // A file with a truncated header
    let path = dir
        .path()
        .join("PRSA_Data_Broken_20130301-20170228.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "No,year,month,day,hour,PM2.5,station").unwrap();

    let report = BatchProcessor::new()
        .process_directory(dir.path(), None)
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    let broken = report.outcomes.iter().find(|o| o.station == "Broken").unwrap();
    assert!(broken.error.is_some());
}
