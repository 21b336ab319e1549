use crate::error::{ProcessingError, Result};
use crate::models::{CleanDataset, CleanRecord, HourlyRecord, Pollutant, StationDataset};
use crate::utils::constants::{IQR_MULTIPLIER, LOWER_QUARTILE, UPPER_QUARTILE};
use crate::utils::stats::{median, mode, quantile};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Transforms a raw station dataset into canonical, analysis-ready form.
///
/// The stages run in a fixed order because later ones depend on earlier
/// results: pollutant medians are computed on the original non-missing
/// values, duplicates are dropped after imputation and timestamp
/// reconstruction, and outlier bounds are computed on the deduplicated
/// column before any value is replaced.
pub struct Cleaner;

impl Cleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, dataset: StationDataset) -> Result<CleanDataset> {
        let station = dataset.station;

        // Imputation values, fixed before any replacement.
        let pollutant_medians = Self::pollutant_medians(&dataset.records, &station)?;
        let wd_mode = mode(dataset.records.iter().filter_map(|r| r.wd.as_deref()));

        // Stages 1-3: impute pollutants, reconstruct the timestamp (dropping
        // the year/month/day/hour source fields), impute wind direction.
        let mut records = Vec::with_capacity(dataset.records.len());
        for raw in &dataset.records {
            let wd = match &raw.wd {
                Some(wd) => wd.clone(),
                None => wd_mode.clone().ok_or_else(|| ProcessingError::DataQuality {
                    station: station.clone(),
                    message: "wind direction column has no observed values".to_string(),
                })?,
            };

            records.push(CleanRecord {
                date_time: raw.timestamp()?,
                pm25: raw.pm25.unwrap_or(pollutant_medians[&Pollutant::Pm25]),
                pm10: raw.pm10.unwrap_or(pollutant_medians[&Pollutant::Pm10]),
                so2: raw.so2.unwrap_or(pollutant_medians[&Pollutant::So2]),
                no2: raw.no2.unwrap_or(pollutant_medians[&Pollutant::No2]),
                co: raw.co.unwrap_or(pollutant_medians[&Pollutant::Co]),
                o3: raw.o3.unwrap_or(pollutant_medians[&Pollutant::O3]),
                temp: raw.temp,
                pres: raw.pres,
                dewp: raw.dewp,
                rain: raw.rain,
                wd,
                wspm: raw.wspm,
                station: station.clone(),
            });
        }

        // Stage 4: drop exact duplicates, keeping the first occurrence.
        let before = records.len();
        let mut seen = HashSet::with_capacity(records.len());
        records.retain(|record| seen.insert(record.row_key()));
        if records.len() < before {
            debug!(
                station = %station,
                dropped = before - records.len(),
                "removed duplicate rows"
            );
        }

        // Stage 5: clip statistical outliers per pollutant column.
        for pollutant in Pollutant::ALL {
            Self::suppress_outliers(&mut records, pollutant);
        }

        Ok(CleanDataset::new(station, records))
    }

    /// Median of each pollutant column over its non-missing values. A column
    /// with no observed values has no median and fails the station.
    fn pollutant_medians(
        records: &[HourlyRecord],
        station: &str,
    ) -> Result<HashMap<Pollutant, f64>> {
        let mut medians = HashMap::new();
        for pollutant in Pollutant::ALL {
            let present: Vec<f64> = records.iter().filter_map(|r| r.pollutant(pollutant)).collect();
            let median = median(&present).ok_or_else(|| ProcessingError::DataQuality {
                station: station.to_string(),
                message: format!("{} column has no observed values", pollutant),
            })?;
            medians.insert(pollutant, median);
        }
        Ok(medians)
    }

    /// Replace values strictly outside [Q1 - 1.5*IQR, Q3 + 1.5*IQR] with the
    /// column median. Bounds and median are computed once on the current
    /// values, so the replacement is a single order-independent pass.
    fn suppress_outliers(records: &mut [CleanRecord], pollutant: Pollutant) {
        let values: Vec<f64> = records.iter().map(|r| r.pollutant(pollutant)).collect();

        let (Some(q1), Some(q3), Some(median)) = (
            quantile(&values, LOWER_QUARTILE),
            quantile(&values, UPPER_QUARTILE),
            median(&values),
        ) else {
            return; // no rows
        };

        let iqr = q3 - q1;
        let lower = q1 - IQR_MULTIPLIER * iqr;
        let upper = q3 + IQR_MULTIPLIER * iqr;

        for record in records.iter_mut() {
            let value = record.pollutant(pollutant);
            if value < lower || value > upper {
                record.set_pollutant(pollutant, median);
            }
        }
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
