use crate::error::Result;
use crate::models::CleanMap;
use crate::processors::{Assessor, Cleaner, DatasetAssessment};
use crate::readers::StationReader;
use crate::utils::filename::station_name_from_path;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one station's pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct StationOutcome {
    pub station: String,
    pub rows_read: usize,
    pub rows_clean: usize,
    pub error: Option<String>,
}

impl StationOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<StationOutcome>,
    pub assessments: Vec<DatasetAssessment>,
    pub cleaned: CleanMap,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Sequential load -> assess -> clean loop over a set of station files.
///
/// Stations are independent, so by default one station's failure is recorded
/// in its outcome and the rest of the batch still completes. Strict mode
/// aborts on the first failure instead.
pub struct BatchProcessor {
    strict: bool,
    assess: bool,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self {
            strict: false,
            assess: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_assessment(mut self, assess: bool) -> Self {
        self.assess = assess;
        self
    }

    /// Process every PRSA source file found in a directory.
    pub fn process_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<BatchReport> {
        let reader = StationReader::new();
        let paths = reader.discover_sources(dir)?;
        self.process_files(&paths, progress)
    }

    pub fn process_files(
        &self,
        paths: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<BatchReport> {
        let reader = StationReader::new();
        let assessor = Assessor::new();
        let cleaner = Cleaner::new();

        let mut report = BatchReport {
            outcomes: Vec::with_capacity(paths.len()),
            assessments: Vec::new(),
            cleaned: CleanMap::new(),
        };

        for path in paths {
            if let Some(p) = progress {
                p.set_message(&format!("Processing {}", path.display()));
            }

            match self.process_station(path, &reader, &assessor, &cleaner, &mut report) {
                Ok(outcome) => {
                    info!(
                        station = %outcome.station,
                        rows_read = outcome.rows_read,
                        rows_clean = outcome.rows_clean,
                        "station cleaned"
                    );
                    report.outcomes.push(outcome);
                }
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    let station = station_name_from_path(path)
                        .unwrap_or_else(|_| path.display().to_string());
                    warn!(station = %station, error = %e, "station failed, continuing batch");
                    report.outcomes.push(StationOutcome {
                        station,
                        rows_read: 0,
                        rows_clean: 0,
                        error: Some(e.to_string()),
                    });
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Processed {} stations ({} failed)",
                report.outcomes.len(),
                report.failed()
            ));
        }

        Ok(report)
    }

    fn process_station(
        &self,
        path: &Path,
        reader: &StationReader,
        assessor: &Assessor,
        cleaner: &Cleaner,
        report: &mut BatchReport,
    ) -> Result<StationOutcome> {
        let dataset = reader.read_station(path)?;
        let rows_read = dataset.len();

        if self.assess {
            report.assessments.push(assessor.assess(&dataset));
        }

        let cleaned = cleaner.clean(dataset)?;
        let outcome = StationOutcome {
            station: cleaned.station.clone(),
            rows_read,
            rows_clean: cleaned.len(),
            error: None,
        };
        report.cleaned.insert(cleaned.station.clone(), cleaned);

        Ok(outcome)
    }

    /// Render the per-station status list.
    pub fn generate_summary(&self, report: &BatchReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Batch Processing Report ===\n");
        summary.push_str(&format!("Stations: {}\n", report.outcomes.len()));
        summary.push_str(&format!(
            "Succeeded: {}, Failed: {}\n",
            report.succeeded(),
            report.failed()
        ));

        for (i, outcome) in report.outcomes.iter().enumerate() {
            match &outcome.error {
                None => summary.push_str(&format!(
                    "  {}. {}: {} rows read, {} rows after cleaning\n",
                    i + 1,
                    outcome.station,
                    outcome.rows_read,
                    outcome.rows_clean
                )),
                Some(error) => summary.push_str(&format!(
                    "  {}. {}: FAILED - {}\n",
                    i + 1,
                    outcome.station,
                    error
                )),
            }
        }

        summary
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

    fn write_source(dir: &TempDir, station: &str, rows: &[String]) {
        let path = dir
            .path()
            .join(format!("PRSA_Data_{}_20130301-20170228.csv", station));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    fn good_rows(station: &str) -> Vec<String> {
        (0..5)
            .map(|hour| {
                format!(
                    "1,2013,3,1,{},{},12,3,15,300,60,-0.7,1023,-18.8,0,NNW,4.4,{}",
                    hour,
                    10 + hour,
                    station
                )
            })
            .collect()
    }

    fn bad_rows(station: &str) -> Vec<String> {
        // PM2.5 entirely missing: DataQuality failure in the cleaner
        (0..5)
            .map(|hour| {
                format!(
                    "1,2013,3,1,{},NA,12,3,15,300,60,-0.7,1023,-18.8,0,NNW,4.4,{}",
                    hour, station
                )
            })
            .collect()
    }

    #[test]
    fn test_batch_isolates_station_failures() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "Changping", &good_rows("Changping"));
        write_source(&dir, "Dingling", &bad_rows("Dingling"));
        write_source(&dir, "Wanliu", &good_rows("Wanliu"));

        let processor = BatchProcessor::new();
        let report = processor.process_directory(dir.path(), None).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.cleaned.contains_key("Changping"));
        assert!(report.cleaned.contains_key("Wanliu"));
        assert!(!report.cleaned.contains_key("Dingling"));

        let failed = report.outcomes.iter().find(|o| !o.succeeded()).unwrap();
        assert_eq!(failed.station, "Dingling");
        assert!(failed.error.as_ref().unwrap().contains("PM2.5"));
    }

    #[test]
    fn test_strict_mode_aborts_on_first_failure() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "Dingling", &bad_rows("Dingling"));
        write_source(&dir, "Wanliu", &good_rows("Wanliu"));

        let processor = BatchProcessor::new().with_strict(true);
        assert!(processor.process_directory(dir.path(), None).is_err());
    }

    #[test]
    fn test_assessments_collected_when_requested() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "Changping", &good_rows("Changping"));

        let report = BatchProcessor::new()
            .with_assessment(true)
            .process_directory(dir.path(), None)
            .unwrap();

        assert_eq!(report.assessments.len(), 1);
        assert_eq!(report.assessments[0].station, "Changping");
    }

    #[test]
    fn test_cleaned_map_is_station_ordered() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "Wanliu", &good_rows("Wanliu"));
        write_source(&dir, "Changping", &good_rows("Changping"));

        let report = BatchProcessor::new()
            .process_directory(dir.path(), None)
            .unwrap();

        let stations: Vec<&String> = report.cleaned.keys().collect();
        assert_eq!(stations, vec!["Changping", "Wanliu"]);
    }
}
