use crate::analyzers::AirQualityAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::models::{StationMap, Variable};
use crate::processors::{Assessor, BatchProcessor, BatchReport};
use crate::readers::StationReader;
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Assess { input_dir, json } => {
            let reader = StationReader::new();
            let assessor = Assessor::new();

            let mut datasets = StationMap::new();
            for path in reader.discover_sources(&input_dir)? {
                let dataset = reader.read_station(&path)?;
                datasets.insert(dataset.station.clone(), dataset);
            }

            let assessments = assessor.assess_all(&datasets);
            if json {
                println!("{}", serde_json::to_string_pretty(&assessments)?);
            } else {
                println!("{}", assessor.generate_summary(&assessments));
            }
        }

        Commands::Process {
            input_dir,
            strict,
            json,
        } => {
            let processor = BatchProcessor::new()
                .with_strict(strict)
                .with_assessment(true);
            let report = run_batch(&processor, &input_dir, cli.quiet)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report.outcomes)?);
            } else {
                println!("{}", Assessor::new().generate_summary(&report.assessments));
                println!("{}", processor.generate_summary(&report));
            }
        }

        Commands::Monthly {
            input_dir,
            pollutant,
            json,
        } => {
            let processor = BatchProcessor::new();
            let batch = run_batch(&processor, &input_dir, cli.quiet)?;

            let report = AirQualityAnalyzer::new().monthly_averages(&batch.cleaned, &pollutant)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.generate_summary());
            }
        }

        Commands::Correlate {
            input_dir,
            station,
            x,
            y,
            start,
            end,
            matrix,
        } => {
            let x: Variable = x.parse()?;
            let y: Variable = y.parse()?;
            let period = parse_period(start, end)?;

            let processor = BatchProcessor::new();
            let batch = run_batch(&processor, &input_dir, cli.quiet)?;

            let analyzer = AirQualityAnalyzer::new();
            let report = analyzer.correlation(&batch.cleaned, &station, x, y, period)?;
            println!(
                "Correlation between {} and {} at {} ({} pairs): r = {:.4}",
                report.x, report.y, report.station, report.pairs, report.coefficient
            );

            if matrix {
                let matrix = analyzer.correlation_matrix(&batch.cleaned, &station, period)?;
                println!("\n{}", matrix.generate_summary());
            }
        }
    }

    Ok(())
}

fn run_batch(processor: &BatchProcessor, input_dir: &Path, quiet: bool) -> Result<BatchReport> {
    let reader = StationReader::new();
    let paths = reader.discover_sources(input_dir)?;

    let progress = ProgressReporter::new(paths.len() as u64, "Processing station files...", quiet);
    processor.process_files(&paths, Some(&progress))
}

fn parse_period(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(Some((start, end))),
        (Some(start), Some(end)) => Err(ProcessingError::Validation(format!(
            "Period start {} must precede end {}",
            start, end
        ))),
        (None, None) => Ok(None),
        _ => Err(ProcessingError::Validation(
            "Both --start and --end are required to filter by period".to_string(),
        )),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2015, 12, 1).unwrap();

        assert_eq!(parse_period(None, None).unwrap(), None);
        assert_eq!(
            parse_period(Some(start), Some(end)).unwrap(),
            Some((start, end))
        );
        assert!(parse_period(Some(start), None).is_err());
        assert!(parse_period(Some(end), Some(start)).is_err());
    }
}
