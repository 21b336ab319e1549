use crate::error::{ProcessingError, Result};
use crate::utils::constants::STATION_TOKEN_INDEX;
use std::path::Path;

/// Extract the station name from a PRSA source file name.
///
/// File names follow `PRSA_Data_<Station>_<daterange>.csv`, so the station is
/// the third underscore-delimited token (e.g.
/// `PRSA_Data_Aotizhongxin_20130301-20170228.csv` -> `Aotizhongxin`).
pub fn station_name_from_path(path: &Path) -> Result<String> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| ProcessingError::InvalidFormat("Invalid file path".to_string()))?;

    let token = filename.split('_').nth(STATION_TOKEN_INDEX).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Filename does not match expected PRSA pattern: {}",
            filename
        ))
    })?;

    if token.is_empty() {
        return Err(ProcessingError::InvalidFormat(format!(
            "Empty station token in filename: {}",
            filename
        )));
    }

    Ok(token.to_string())
}
