use crate::error::{ProcessingError, Result};
use crate::models::{Pollutant, Variable};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// PRSA files mark missing measurements as `NA`; treat that (and empty cells)
/// as absent rather than a parse failure.
fn de_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") => Ok(None),
        Some(value) => value.parse::<f64>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn de_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") => Ok(None),
        Some(value) => Ok(Some(value.to_string())),
    }
}

/// One raw hourly measurement row, exactly as read from a station file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HourlyRecord {
    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 1, max = 31))]
    pub day: u32,

    #[validate(range(max = 23))]
    pub hour: u32,

    #[serde(rename = "PM2.5", deserialize_with = "de_opt_f64")]
    pub pm25: Option<f64>,

    #[serde(rename = "PM10", deserialize_with = "de_opt_f64")]
    pub pm10: Option<f64>,

    #[serde(rename = "SO2", deserialize_with = "de_opt_f64")]
    pub so2: Option<f64>,

    #[serde(rename = "NO2", deserialize_with = "de_opt_f64")]
    pub no2: Option<f64>,

    #[serde(rename = "CO", deserialize_with = "de_opt_f64")]
    pub co: Option<f64>,

    #[serde(rename = "O3", deserialize_with = "de_opt_f64")]
    pub o3: Option<f64>,

    #[serde(rename = "TEMP", deserialize_with = "de_opt_f64")]
    pub temp: Option<f64>,

    #[serde(rename = "PRES", deserialize_with = "de_opt_f64")]
    pub pres: Option<f64>,

    #[serde(rename = "DEWP", deserialize_with = "de_opt_f64")]
    pub dewp: Option<f64>,

    #[serde(rename = "RAIN", deserialize_with = "de_opt_f64")]
    pub rain: Option<f64>,

    #[serde(rename = "wd", deserialize_with = "de_opt_string")]
    pub wd: Option<String>,

    #[serde(rename = "WSPM", deserialize_with = "de_opt_f64")]
    pub wspm: Option<f64>,

    pub station: String,
}

impl HourlyRecord {
    pub fn pollutant(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn set_pollutant(&mut self, pollutant: Pollutant, value: f64) {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = Some(value),
            Pollutant::Pm10 => self.pm10 = Some(value),
            Pollutant::So2 => self.so2 = Some(value),
            Pollutant::No2 => self.no2 = Some(value),
            Pollutant::Co => self.co = Some(value),
            Pollutant::O3 => self.o3 = Some(value),
        }
    }

    /// Combine the year/month/day/hour components into a single timestamp.
    /// An impossible combination (e.g. day 31 in a 30-day month) is fatal.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, 0, 0))
            .ok_or_else(|| {
                ProcessingError::Validation(format!(
                    "Invalid date components for station {}: {}-{:02}-{:02} hour {}",
                    self.station, self.year, self.month, self.day, self.hour
                ))
            })
    }

    /// Equality key over all columns, with float columns compared bitwise so
    /// missing values compare equal to each other.
    pub fn row_key(&self) -> RawRowKey {
        RawRowKey {
            time: (self.year, self.month, self.day, self.hour),
            values: [
                self.pm25.map(f64::to_bits),
                self.pm10.map(f64::to_bits),
                self.so2.map(f64::to_bits),
                self.no2.map(f64::to_bits),
                self.co.map(f64::to_bits),
                self.o3.map(f64::to_bits),
                self.temp.map(f64::to_bits),
                self.pres.map(f64::to_bits),
                self.dewp.map(f64::to_bits),
                self.rain.map(f64::to_bits),
                self.wspm.map(f64::to_bits),
            ],
            wd: self.wd.clone(),
            station: self.station.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRowKey {
    time: (i32, u32, u32, u32),
    values: [Option<u64>; 11],
    wd: Option<String>,
    station: String,
}

/// One analysis-ready row: timestamp reconstructed, pollutants and wind
/// direction guaranteed present. Meteorological fields are never imputed and
/// may still be missing.
#[derive(Debug, Clone, Serialize)]
pub struct CleanRecord {
    pub date_time: NaiveDateTime,
    pub pm25: f64,
    pub pm10: f64,
    pub so2: f64,
    pub no2: f64,
    pub co: f64,
    pub o3: f64,
    pub temp: Option<f64>,
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub rain: Option<f64>,
    pub wd: String,
    pub wspm: Option<f64>,
    pub station: String,
}

impl CleanRecord {
    pub fn pollutant(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn set_pollutant(&mut self, pollutant: Pollutant, value: f64) {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = value,
            Pollutant::Pm10 => self.pm10 = value,
            Pollutant::So2 => self.so2 = value,
            Pollutant::No2 => self.no2 = value,
            Pollutant::Co => self.co = value,
            Pollutant::O3 => self.o3 = value,
        }
    }

    pub fn variable(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Pollutant(p) => Some(self.pollutant(p)),
            Variable::Temp => self.temp,
            Variable::Pres => self.pres,
            Variable::Dewp => self.dewp,
            Variable::Rain => self.rain,
            Variable::Wspm => self.wspm,
        }
    }

    /// Decompose `date_time` back into the original source components.
    pub fn time_components(&self) -> (i32, u32, u32, u32) {
        (
            self.date_time.year(),
            self.date_time.month(),
            self.date_time.day(),
            self.date_time.hour(),
        )
    }

    /// Equality key over all columns for duplicate removal.
    pub fn row_key(&self) -> CleanRowKey {
        CleanRowKey {
            date_time: self.date_time,
            pollutants: [
                self.pm25.to_bits(),
                self.pm10.to_bits(),
                self.so2.to_bits(),
                self.no2.to_bits(),
                self.co.to_bits(),
                self.o3.to_bits(),
            ],
            meteo: [
                self.temp.map(f64::to_bits),
                self.pres.map(f64::to_bits),
                self.dewp.map(f64::to_bits),
                self.rain.map(f64::to_bits),
                self.wspm.map(f64::to_bits),
            ],
            wd: self.wd.clone(),
            station: self.station.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CleanRowKey {
    date_time: NaiveDateTime,
    pollutants: [u64; 6],
    meteo: [Option<u64>; 5],
    wd: String,
    station: String,
}
