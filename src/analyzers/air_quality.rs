use crate::error::{ProcessingError, Result};
use crate::models::{CleanDataset, CleanMap, Pollutant, Variable};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean pollutant level for one calendar month at one station. Derived on
/// demand from cleaned data, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAverage {
    pub year: i32,
    pub month: u32,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySeries {
    pub station: String,
    pub points: Vec<MonthlyAverage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlyAverage {
    pub year: i32,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub pollutant: Pollutant,
    pub series: Vec<MonthlySeries>,
    /// Cross-station yearly means, for the peak-year question.
    pub yearly: Vec<YearlyAverage>,
    pub peak_year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub station: String,
    pub x: Variable,
    pub y: Variable,
    pub pairs: usize,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub station: String,
    pub variables: Vec<Variable>,
    /// Row-major coefficients; `None` where undefined (zero variance or too
    /// few overlapping observations).
    pub coefficients: Vec<Vec<Option<f64>>>,
}

/// Pure, stateless queries over cleaned station data. This is the boundary
/// the plotting collaborator consumes; everything here is read-only.
pub struct AirQualityAnalyzer;

impl AirQualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Monthly and yearly mean levels for a particulate pollutant across all
    /// stations. The pollutant argument is validated before anything is
    /// computed: only PM2.5 and PM10 are accepted.
    pub fn monthly_averages(&self, datasets: &CleanMap, pollutant_arg: &str) -> Result<MonthlyReport> {
        let pollutant = Pollutant::parse_report_pollutant(pollutant_arg)?;

        let mut series = Vec::with_capacity(datasets.len());
        let mut yearly_bins: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

        for dataset in datasets.values() {
            let mut monthly_bins: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
            for record in &dataset.records {
                let value = record.pollutant(pollutant);
                let key = (record.date_time.year(), record.date_time.month());
                let bin = monthly_bins.entry(key).or_insert((0.0, 0));
                bin.0 += value;
                bin.1 += 1;

                let year_bin = yearly_bins.entry(key.0).or_insert((0.0, 0));
                year_bin.0 += value;
                year_bin.1 += 1;
            }

            series.push(MonthlySeries {
                station: dataset.station.clone(),
                points: monthly_bins
                    .into_iter()
                    .map(|((year, month), (sum, count))| MonthlyAverage {
                        year,
                        month,
                        mean: sum / count as f64,
                    })
                    .collect(),
            });
        }

        let yearly: Vec<YearlyAverage> = yearly_bins
            .into_iter()
            .map(|(year, (sum, count))| YearlyAverage {
                year,
                mean: sum / count as f64,
            })
            .collect();

        let peak_year = yearly
            .iter()
            .max_by(|a, b| a.mean.total_cmp(&b.mean))
            .map(|y| y.year)
            .ok_or_else(|| ProcessingError::DataQuality {
                station: "(all)".to_string(),
                message: "no cleaned rows to aggregate".to_string(),
            })?;

        Ok(MonthlyReport {
            pollutant,
            series,
            yearly,
            peak_year,
        })
    }

    /// Pearson correlation between two numeric columns of one explicitly
    /// named station, over an optional `[start, end)` date window.
    pub fn correlation(
        &self,
        datasets: &CleanMap,
        station: &str,
        x: Variable,
        y: Variable,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<CorrelationReport> {
        let dataset = datasets
            .get(station)
            .ok_or_else(|| ProcessingError::StationNotFound {
                station: station.to_string(),
            })?;

        let (xs, ys) = Self::paired_values(dataset, x, y, period);
        let coefficient =
            crate::utils::stats::pearson(&xs, &ys).ok_or_else(|| ProcessingError::DataQuality {
                station: station.to_string(),
                message: format!(
                    "correlation between {} and {} is undefined ({} usable pairs)",
                    x,
                    y,
                    xs.len()
                ),
            })?;

        Ok(CorrelationReport {
            station: station.to_string(),
            x,
            y,
            pairs: xs.len(),
            coefficient,
        })
    }

    /// Pairwise correlation matrix over every numeric column of one station.
    pub fn correlation_matrix(
        &self,
        datasets: &CleanMap,
        station: &str,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<CorrelationMatrix> {
        let dataset = datasets
            .get(station)
            .ok_or_else(|| ProcessingError::StationNotFound {
                station: station.to_string(),
            })?;

        let variables = Variable::all();
        let mut coefficients = Vec::with_capacity(variables.len());

        for &x in &variables {
            let mut row = Vec::with_capacity(variables.len());
            for &y in &variables {
                let (xs, ys) = Self::paired_values(dataset, x, y, period);
                row.push(crate::utils::stats::pearson(&xs, &ys));
            }
            coefficients.push(row);
        }

        Ok(CorrelationMatrix {
            station: station.to_string(),
            variables,
            coefficients,
        })
    }

    /// Rows where both variables are observed, optionally restricted to a
    /// `[start, end)` date window.
    fn paired_values(
        dataset: &CleanDataset,
        x: Variable,
        y: Variable,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for record in &dataset.records {
            if let Some((start, end)) = period {
                let date = record.date_time.date();
                if date < start || date >= end {
                    continue;
                }
            }
            if let (Some(x_val), Some(y_val)) = (record.variable(x), record.variable(y)) {
                xs.push(x_val);
                ys.push(y_val);
            }
        }

        (xs, ys)
    }
}

impl Default for AirQualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MonthlyReport {
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "=== Monthly Average {} Levels ===\n",
            self.pollutant
        ));
        for series in &self.series {
            summary.push_str(&format!("{}:\n", series.station));
            for point in &series.points {
                summary.push_str(&format!(
                    "  {}-{:02}: {:.2}\n",
                    point.year, point.month, point.mean
                ));
            }
        }

        summary.push_str("\nYearly averages (all stations):\n");
        for year in &self.yearly {
            summary.push_str(&format!("  {}: {:.2}\n", year.year, year.mean));
        }
        summary.push_str(&format!(
            "\nPeak {} year: {}\n",
            self.pollutant, self.peak_year
        ));

        summary
    }
}

impl CorrelationMatrix {
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "=== Correlation Matrix: {} Station ===\n",
            self.station
        ));
        summary.push_str(&format!("{:>7}", ""));
        for variable in &self.variables {
            summary.push_str(&format!(" {:>6}", variable.as_str()));
        }
        summary.push('\n');

        for (variable, row) in self.variables.iter().zip(&self.coefficients) {
            summary.push_str(&format!("{:>7}", variable.as_str()));
            for coefficient in row {
                match coefficient {
                    Some(r) => summary.push_str(&format!(" {:>6.2}", r)),
                    None => summary.push_str(&format!(" {:>6}", "n/a")),
                }
            }
            summary.push('\n');
        }

        summary
    }
}
