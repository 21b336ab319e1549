use crate::models::{HourlyRecord, Pollutant, StationDataset, StationMap};
use crate::utils::stats::SummaryStats;
use serde::Serialize;
use std::collections::HashSet;

/// Read-only diagnostics for one raw station dataset: missing counts, column
/// types, duplicate rows and descriptive statistics. Mutates nothing; used to
/// show what the cleaning stage is about to fix.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetAssessment {
    pub station: String,
    pub row_count: usize,
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnAssessment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnAssessment {
    pub column: String,
    pub dtype: &'static str,
    pub missing: usize,
    /// Present for numeric columns with at least one observed value.
    pub summary: Option<SummaryStats>,
}

impl DatasetAssessment {
    /// True when cleaning would change nothing visible to these diagnostics.
    pub fn is_clean(&self) -> bool {
        self.duplicate_rows == 0 && self.columns.iter().all(|c| c.missing == 0)
    }
}

pub struct Assessor;

impl Assessor {
    pub fn new() -> Self {
        Self
    }

    pub fn assess_all(&self, datasets: &StationMap) -> Vec<DatasetAssessment> {
        datasets.values().map(|ds| self.assess(ds)).collect()
    }

    pub fn assess(&self, dataset: &StationDataset) -> DatasetAssessment {
        let records = &dataset.records;

        let mut columns = Vec::new();
        for (name, values) in Self::time_columns(records) {
            columns.push(ColumnAssessment {
                column: name.to_string(),
                dtype: if name == "year" { "i32" } else { "u32" },
                missing: 0,
                summary: SummaryStats::describe(&values),
            });
        }

        for (name, present, total) in Self::float_columns(records) {
            columns.push(ColumnAssessment {
                column: name.to_string(),
                dtype: "f64",
                missing: total - present.len(),
                summary: SummaryStats::describe(&present),
            });
        }

        let wd_missing = records.iter().filter(|r| r.wd.is_none()).count();
        columns.push(ColumnAssessment {
            column: "wd".to_string(),
            dtype: "str",
            missing: wd_missing,
            summary: None,
        });
        columns.push(ColumnAssessment {
            column: "station".to_string(),
            dtype: "str",
            missing: 0,
            summary: None,
        });

        DatasetAssessment {
            station: dataset.station.clone(),
            row_count: records.len(),
            duplicate_rows: Self::count_duplicates(records),
            columns,
        }
    }

    /// Rows that exactly repeat an earlier row across all columns.
    fn count_duplicates(records: &[HourlyRecord]) -> usize {
        let mut seen = HashSet::with_capacity(records.len());
        records
            .iter()
            .filter(|record| !seen.insert(record.row_key()))
            .count()
    }

    fn time_columns(records: &[HourlyRecord]) -> Vec<(&'static str, Vec<f64>)> {
        vec![
            ("year", records.iter().map(|r| r.year as f64).collect()),
            ("month", records.iter().map(|r| r.month as f64).collect()),
            ("day", records.iter().map(|r| r.day as f64).collect()),
            ("hour", records.iter().map(|r| r.hour as f64).collect()),
        ]
    }

    /// Observed (non-missing) values per float column, with the row total for
    /// missing-count computation.
    fn float_columns(records: &[HourlyRecord]) -> Vec<(&'static str, Vec<f64>, usize)> {
        let total = records.len();
        let mut columns: Vec<(&'static str, Vec<f64>, usize)> = Pollutant::ALL
            .iter()
            .map(|p| {
                let present: Vec<f64> =
                    records.iter().filter_map(|r| r.pollutant(*p)).collect();
                (p.as_str(), present, total)
            })
            .collect();

        let meteo: [(&'static str, fn(&HourlyRecord) -> Option<f64>); 5] = [
            ("TEMP", |r| r.temp),
            ("PRES", |r| r.pres),
            ("DEWP", |r| r.dewp),
            ("RAIN", |r| r.rain),
            ("WSPM", |r| r.wspm),
        ];
        for (name, accessor) in meteo {
            let present: Vec<f64> = records.iter().filter_map(accessor).collect();
            columns.push((name, present, total));
        }

        columns
    }

    /// Render assessments as a text report, one section per station.
    pub fn generate_summary(&self, assessments: &[DatasetAssessment]) -> String {
        let mut summary = String::new();

        for assessment in assessments {
            summary.push_str(&format!("--- {} Station ---\n", assessment.station));
            summary.push_str(&format!("Rows: {}\n", assessment.row_count));
            summary.push_str(&format!("Duplicate rows: {}\n", assessment.duplicate_rows));

            summary.push_str("Missing values:\n");
            for column in &assessment.columns {
                if column.missing > 0 {
                    summary.push_str(&format!("  {:<8} {}\n", column.column, column.missing));
                }
            }
            if assessment.columns.iter().all(|c| c.missing == 0) {
                summary.push_str("  (none)\n");
            }

            summary.push_str("Columns:\n");
            for column in &assessment.columns {
                match &column.summary {
                    Some(stats) => summary.push_str(&format!(
                        "  {:<8} {:<4} count={} mean={:.2} std={} min={:.2} 25%={:.2} 50%={:.2} 75%={:.2} max={:.2}\n",
                        column.column,
                        column.dtype,
                        stats.count,
                        stats.mean,
                        stats
                            .std
                            .map_or("n/a".to_string(), |s| format!("{:.2}", s)),
                        stats.min,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.max,
                    )),
                    None => summary.push_str(&format!(
                        "  {:<8} {}\n",
                        column.column, column.dtype
                    )),
                }
            }
            summary.push('\n');
        }

        summary
    }
}

impl Default for Assessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(hour: u32, pm25: Option<f64>, wd: Option<&str>) -> HourlyRecord {
        HourlyRecord {
            year: 2013,
            month: 3,
            day: 1,
            hour,
            pm25,
            pm10: Some(12.0),
            so2: Some(3.0),
            no2: Some(15.0),
            co: Some(300.0),
            o3: Some(60.0),
            temp: Some(-0.5),
            pres: Some(1024.5),
            dewp: Some(-18.8),
            rain: Some(0.0),
            wd: wd.map(str::to_string),
            wspm: Some(4.4),
            station: "Gucheng".to_string(),
        }
    }

    #[test]
    fn test_missing_counts() {
        let dataset = StationDataset::new(
            "Gucheng".to_string(),
            vec![
                record(0, Some(10.0), Some("NW")),
                record(1, None, None),
                record(2, None, Some("SE")),
            ],
        );

        let assessment = Assessor::new().assess(&dataset);

        let pm25 = assessment
            .columns
            .iter()
            .find(|c| c.column == "PM2.5")
            .unwrap();
        assert_eq!(pm25.missing, 2);
        assert_eq!(pm25.dtype, "f64");

        let wd = assessment.columns.iter().find(|c| c.column == "wd").unwrap();
        assert_eq!(wd.missing, 1);
        assert!(!assessment.is_clean());
    }

    #[test]
    fn test_duplicate_detection_counts_repeats_only() {
        let dataset = StationDataset::new(
            "Gucheng".to_string(),
            vec![
                record(0, Some(10.0), Some("NW")),
                record(0, Some(10.0), Some("NW")),
                record(0, Some(10.0), Some("NW")),
                record(1, Some(10.0), Some("NW")),
            ],
        );

        let assessment = Assessor::new().assess(&dataset);
        assert_eq!(assessment.duplicate_rows, 2);
    }

    #[test]
    fn test_duplicates_with_missing_values_compare_equal() {
        let dataset = StationDataset::new(
            "Gucheng".to_string(),
            vec![record(0, None, None), record(0, None, None)],
        );

        let assessment = Assessor::new().assess(&dataset);
        assert_eq!(assessment.duplicate_rows, 1);
    }

    #[test]
    fn test_assessment_does_not_mutate() {
        let dataset = StationDataset::new(
            "Gucheng".to_string(),
            vec![record(0, None, Some("NW")), record(1, Some(5.0), None)],
        );
        let before: Vec<_> = dataset.records.iter().map(|r| r.row_key()).collect();

        let _ = Assessor::new().assess(&dataset);

        let after: Vec<_> = dataset.records.iter().map(|r| r.row_key()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_summary_statistics() {
        let mut records = Vec::new();
        for (i, v) in [1.0, 2.0, 3.0, 4.0, 5.0].iter().enumerate() {
            records.push(record(i as u32, Some(*v), Some("NW")));
        }
        let dataset = StationDataset::new("Gucheng".to_string(), records);

        let assessment = Assessor::new().assess(&dataset);
        let pm25 = assessment
            .columns
            .iter()
            .find(|c| c.column == "PM2.5")
            .unwrap();
        let stats = pm25.summary.as_ref().unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
    }
}
