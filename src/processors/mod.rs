pub mod assessor;
pub mod batch;
pub mod cleaner;

pub use assessor::{Assessor, ColumnAssessment, DatasetAssessment};
pub use batch::{BatchProcessor, BatchReport, StationOutcome};
pub use cleaner::Cleaner;
