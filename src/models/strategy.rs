//! Options strategy recommendation models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::valuation::ValuationBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolRegime {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasStrength {
    Strong,
    Weak,
}

/// Map a valuation band to a directional bias: price is expected to revert
/// toward the model, so undervaluation is bullish.
pub fn bias_from_band(band: ValuationBand) -> (Bias, BiasStrength) {
    match band {
        ValuationBand::SeverelyUndervalued => (Bias::Bullish, BiasStrength::Strong),
        ValuationBand::Undervalued => (Bias::Bullish, BiasStrength::Weak),
        ValuationBand::Fair => (Bias::Neutral, BiasStrength::Weak),
        ValuationBand::Overvalued => (Bias::Bearish, BiasStrength::Weak),
        ValuationBand::SeverelyOvervalued => (Bias::Bearish, BiasStrength::Strong),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsStrategy {
    LongCalls,
    LongPuts,
    LongStraddle,
    ShortPuts,
    ShortCalls,
    ShortStrangle,
    ModerateStrategies,
    NoPreference,
}

impl OptionsStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LongCalls => "Long Calls",
            Self::LongPuts => "Long Puts",
            Self::LongStraddle => "Long Straddle",
            Self::ShortPuts => "Short Puts",
            Self::ShortCalls => "Short Calls",
            Self::ShortStrangle => "Short Strangle",
            Self::ModerateStrategies => "Moderate Strategies",
            Self::NoPreference => "No Preference",
        }
    }
}

impl fmt::Display for OptionsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub iv_rank: f64,
    pub vol_regime: VolRegime,
    pub bias: Bias,
    pub strategy: OptionsStrategy,
    pub conflict: bool,
}
