//! Shared data models spanning the engine layers.

pub mod alert;
pub mod evaluation;
pub mod indicators;
pub mod price;
pub mod signal;
pub mod strategy;
pub mod valuation;

pub use alert::{Alert, AlertKind, AlertSeverity};
pub use evaluation::{DailyEvaluation, DailyInputs, DataQuality, SignalReport};
pub use indicators::{
    ConvergenceTrend, EmaIndicator, IndicatorReading, MarketRegime, PiCycleProximity,
    PiCycleReading, PiCycleTrend, RsiIndicator,
};
pub use price::PricePoint;
pub use signal::{RawCondition, SignalName, SignalState, SignalStatus, Transition};
pub use strategy::{Bias, BiasStrength, OptionsStrategy, StrategyRecommendation, VolRegime};
pub use valuation::{ValuationBand, ValuationResult};
