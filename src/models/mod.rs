pub mod dataset;
pub mod pollutant;
pub mod record;

pub use dataset::{CleanDataset, CleanMap, StationDataset, StationMap};
pub use pollutant::{Pollutant, Variable};
pub use record::{CleanRecord, HourlyRecord};
