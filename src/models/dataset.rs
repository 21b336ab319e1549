use crate::models::{CleanRecord, HourlyRecord};
use std::collections::BTreeMap;

/// All raw rows for one monitoring station, keyed by the station name taken
/// from the source file name.
#[derive(Debug, Clone)]
pub struct StationDataset {
    pub station: String,
    pub records: Vec<HourlyRecord>,
}

impl StationDataset {
    pub fn new(station: String, records: Vec<HourlyRecord>) -> Self {
        Self { station, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Analysis-ready counterpart of [`StationDataset`].
#[derive(Debug, Clone)]
pub struct CleanDataset {
    pub station: String,
    pub records: Vec<CleanRecord>,
}

impl CleanDataset {
    pub fn new(station: String, records: Vec<CleanRecord>) -> Self {
        Self { station, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Station name -> dataset. A `BTreeMap` keeps report output in a stable
/// station order across runs.
pub type StationMap = BTreeMap<String, StationDataset>;
pub type CleanMap = BTreeMap<String, CleanDataset>;
