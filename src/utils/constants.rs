/// Pollutant measurement columns, in the order they appear in the source files
pub const POLLUTANT_COLUMNS: [&str; 6] = ["PM2.5", "PM10", "SO2", "NO2", "CO", "O3"];

/// Meteorological measurement columns (never imputed)
pub const METEO_COLUMNS: [&str; 5] = ["TEMP", "PRES", "DEWP", "RAIN", "WSPM"];

/// Columns that must be present in every source file header
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "year", "month", "day", "hour", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES",
    "DEWP", "RAIN", "wd", "WSPM", "station",
];

/// Source file naming
pub const SOURCE_FILE_PREFIX: &str = "PRSA_Data_";
pub const SOURCE_FILE_EXTENSION: &str = "csv";

/// Position of the station name among underscore-delimited filename tokens
pub const STATION_TOKEN_INDEX: usize = 2;

/// Number of stations in a complete PRSA archive
pub const EXPECTED_STATION_COUNT: usize = 12;

/// Outlier bounds: [Q1 - 1.5*IQR, Q3 + 1.5*IQR]
pub const LOWER_QUARTILE: f64 = 0.25;
pub const UPPER_QUARTILE: f64 = 0.75;
pub const IQR_MULTIPLIER: f64 = 1.5;
