use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDate, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Extract closes from an ordered series.
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}
