use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six pollutant measurement columns of a PRSA dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Pm25,
    Pm10,
    So2,
    No2,
    Co,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Column name as it appears in the source files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Particulate-matter pollutants are the only ones the monthly report
    /// accepts.
    pub fn is_particulate(&self) -> bool {
        matches!(self, Pollutant::Pm25 | Pollutant::Pm10)
    }

    /// Parse a pollutant argument for the monthly-average report. Anything
    /// other than PM2.5 or PM10 is rejected before any output is produced.
    pub fn parse_report_pollutant(value: &str) -> Result<Pollutant> {
        let pollutant = value.parse::<Pollutant>()?;
        if !pollutant.is_particulate() {
            return Err(ProcessingError::Validation(format!(
                "Pollutant '{}' is not supported by the monthly report (expected PM2.5 or PM10)",
                value
            )));
        }
        Ok(pollutant)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pollutant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "PM2.5" | "PM25" => Ok(Pollutant::Pm25),
            "PM10" => Ok(Pollutant::Pm10),
            "SO2" => Ok(Pollutant::So2),
            "NO2" => Ok(Pollutant::No2),
            "CO" => Ok(Pollutant::Co),
            "O3" => Ok(Pollutant::O3),
            _ => Err(ProcessingError::Validation(format!(
                "Unknown pollutant: '{}'",
                s
            ))),
        }
    }
}

/// Any numeric column of a cleaned dataset, usable on either axis of a
/// correlation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    Pollutant(Pollutant),
    Temp,
    Pres,
    Dewp,
    Rain,
    Wspm,
}

impl Variable {
    pub const METEOROLOGICAL: [Variable; 5] = [
        Variable::Temp,
        Variable::Pres,
        Variable::Dewp,
        Variable::Rain,
        Variable::Wspm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Pollutant(p) => p.as_str(),
            Variable::Temp => "TEMP",
            Variable::Pres => "PRES",
            Variable::Dewp => "DEWP",
            Variable::Rain => "RAIN",
            Variable::Wspm => "WSPM",
        }
    }

    /// All numeric columns, pollutants first, in source-file order.
    pub fn all() -> Vec<Variable> {
        Pollutant::ALL
            .iter()
            .map(|p| Variable::Pollutant(*p))
            .chain(Self::METEOROLOGICAL)
            .collect()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(pollutant) = s.parse::<Pollutant>() {
            return Ok(Variable::Pollutant(pollutant));
        }
        match s.to_uppercase().as_str() {
            "TEMP" => Ok(Variable::Temp),
            "PRES" => Ok(Variable::Pres),
            "DEWP" => Ok(Variable::Dewp),
            "RAIN" => Ok(Variable::Rain),
            "WSPM" => Ok(Variable::Wspm),
            _ => Err(ProcessingError::Validation(format!(
                "Unknown column: '{}'",
                s
            ))),
        }
    }
}
