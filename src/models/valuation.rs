use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBand {
    SeverelyUndervalued,
    Undervalued,
    Fair,
    Overvalued,
    SeverelyOvervalued,
}

impl ValuationBand {
    /// Bands are inclusive toward the more extreme side.
    pub fn from_deviation_pct(deviation_pct: f64) -> Self {
        if deviation_pct <= -25.0 {
            Self::SeverelyUndervalued
        } else if deviation_pct <= -15.0 {
            Self::Undervalued
        } else if deviation_pct < 15.0 {
            Self::Fair
        } else if deviation_pct < 25.0 {
            Self::Overvalued
        } else {
            Self::SeverelyOvervalued
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub model_price: f64,
    pub actual_price: f64,
    pub deviation_pct: f64,
    pub band: ValuationBand,
}
