use crate::error::{ProcessingError, Result};
use crate::models::{HourlyRecord, StationDataset};
use crate::utils::constants::{
    EXPECTED_STATION_COUNT, REQUIRED_COLUMNS, SOURCE_FILE_EXTENSION, SOURCE_FILE_PREFIX,
};
use crate::utils::filename::station_name_from_path;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use validator::Validate;

pub struct StationReader {
    validate_rows: bool,
}

impl StationReader {
    pub fn new() -> Self {
        Self {
            validate_rows: true,
        }
    }

    pub fn with_row_validation(validate_rows: bool) -> Self {
        Self { validate_rows }
    }

    /// Discover PRSA source files in a directory, in stable name order.
    pub fn discover_sources(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|e| ProcessingError::FileAccess {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let name = path.file_name().and_then(|f| f.to_str()).unwrap_or("");
                name.starts_with(SOURCE_FILE_PREFIX)
                    && path.extension().and_then(|e| e.to_str()) == Some(SOURCE_FILE_EXTENSION)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ProcessingError::FileAccess {
                path: dir.to_path_buf(),
                message: format!("No {}*.csv files found", SOURCE_FILE_PREFIX),
            });
        }

        if paths.len() != EXPECTED_STATION_COUNT {
            warn!(
                found = paths.len(),
                expected = EXPECTED_STATION_COUNT,
                "unexpected number of station files"
            );
        }

        Ok(paths)
    }

    /// Read one station file into a dataset. Single attempt; an unreadable
    /// file or a header missing any required column is fatal for this source.
    pub fn read_station(&self, path: &Path) -> Result<StationDataset> {
        let station = station_name_from_path(path)?;

        let file = File::open(path).map_err(|e| ProcessingError::FileAccess {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        self.check_schema(path, reader.headers()?)?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<HourlyRecord>().enumerate() {
            let record: HourlyRecord = result.map_err(|e| ProcessingError::FileAccess {
                path: path.to_path_buf(),
                message: format!("row {}: {}", row + 1, e),
            })?;

            if self.validate_rows {
                record.validate().map_err(|e| {
                    ProcessingError::Validation(format!(
                        "{}: row {}: {}",
                        station,
                        row + 1,
                        e
                    ))
                })?;
            }

            records.push(record);
        }

        debug!(station = %station, rows = records.len(), "loaded station file");

        Ok(StationDataset::new(station, records))
    }

    /// Verify every required column is present; extra columns (the PRSA `No`
    /// row index) are ignored.
    fn check_schema(&self, path: &Path, headers: &csv::StringRecord) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(ProcessingError::FileAccess {
                path: path.to_path_buf(),
                message: format!("missing required columns: {}", missing.join(", ")),
            });
        }

        Ok(())
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}
