pub mod constants;
pub mod filename;
pub mod progress;
pub mod stats;

pub use constants::*;
pub use filename::station_name_from_path;
pub use progress::ProgressReporter;
pub use stats::{mean, median, mode, pearson, quantile, std_dev, SummaryStats};
