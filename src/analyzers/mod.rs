pub mod air_quality;

pub use air_quality::{
    AirQualityAnalyzer, CorrelationMatrix, CorrelationReport, MonthlyAverage, MonthlyReport,
    MonthlySeries, YearlyAverage,
};
