//! Options strategy decision table over IV rank and directional bias.

use tracing::debug;

use crate::config::VolatilityThresholds;
use crate::error::{CoreError, Result};
use crate::models::strategy::{Bias, BiasStrength, OptionsStrategy, StrategyRecommendation, VolRegime};

/// Caller-supplied inconsistency rule over `(iv_rank, bias, recent_trend_pct)`.
///
/// Any `Fn(f64, Bias, f64) -> bool` closure is a rule.
pub trait ConflictRule: Send + Sync {
    fn is_conflicting(&self, iv_rank: f64, bias: Bias, recent_trend_pct: f64) -> bool;
}

impl<F> ConflictRule for F
where
    F: Fn(f64, Bias, f64) -> bool + Send + Sync,
{
    fn is_conflicting(&self, iv_rank: f64, bias: Bias, recent_trend_pct: f64) -> bool {
        self(iv_rank, bias, recent_trend_pct)
    }
}

/// Default rule: never flags a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConflict;

impl ConflictRule for NoConflict {
    fn is_conflicting(&self, _iv_rank: f64, _bias: Bias, _recent_trend_pct: f64) -> bool {
        false
    }
}

pub fn select_strategy(regime: VolRegime, bias: Bias, strength: BiasStrength) -> OptionsStrategy {
    match (regime, bias) {
        (VolRegime::Low, Bias::Bullish) => OptionsStrategy::LongCalls,
        (VolRegime::Low, Bias::Bearish) => OptionsStrategy::LongPuts,
        (VolRegime::Low, Bias::Neutral) => OptionsStrategy::LongStraddle,
        (VolRegime::High, Bias::Bullish) => OptionsStrategy::ShortPuts,
        (VolRegime::High, Bias::Bearish) => OptionsStrategy::ShortCalls,
        (VolRegime::High, Bias::Neutral) => OptionsStrategy::ShortStrangle,
        (VolRegime::Normal, Bias::Neutral) => OptionsStrategy::NoPreference,
        (VolRegime::Normal, _) => match strength {
            BiasStrength::Strong => OptionsStrategy::ModerateStrategies,
            BiasStrength::Weak => OptionsStrategy::NoPreference,
        },
    }
}

pub struct OptionsClassifier {
    thresholds: VolatilityThresholds,
    rule: Box<dyn ConflictRule>,
}

impl Default for OptionsClassifier {
    fn default() -> Self {
        Self::new(VolatilityThresholds::default())
    }
}

impl OptionsClassifier {
    pub fn new(thresholds: VolatilityThresholds) -> Self {
        Self {
            thresholds,
            rule: Box::new(NoConflict),
        }
    }

    pub fn with_conflict_rule(mut self, rule: impl ConflictRule + 'static) -> Self {
        self.rule = Box::new(rule);
        self
    }

    /// IV rank must lie in `0..=100`.
    pub fn vol_regime(&self, iv_rank: f64) -> Result<VolRegime> {
        if !(0.0..=100.0).contains(&iv_rank) {
            return Err(CoreError::invalid(format!(
                "IV rank must be within 0-100, got {}",
                iv_rank
            )));
        }
        Ok(if iv_rank < self.thresholds.low_below {
            VolRegime::Low
        } else if iv_rank > self.thresholds.high_above {
            VolRegime::High
        } else {
            VolRegime::Normal
        })
    }

    /// Classify; `recent_trend_pct` feeds the conflict rule and a missing
    /// trend never conflicts.
    pub fn classify(
        &self,
        iv_rank: f64,
        bias: Bias,
        strength: BiasStrength,
        recent_trend_pct: Option<f64>,
    ) -> Result<StrategyRecommendation> {
        let vol_regime = self.vol_regime(iv_rank)?;
        let strategy = select_strategy(vol_regime, bias, strength);
        let conflict = recent_trend_pct
            .map(|trend| self.rule.is_conflicting(iv_rank, bias, trend))
            .unwrap_or(false);

        debug!(
            iv_rank,
            ?vol_regime,
            ?bias,
            strategy = %strategy,
            conflict,
            "Options strategy classified"
        );

        Ok(StrategyRecommendation {
            iv_rank,
            vol_regime,
            bias,
            strategy,
            conflict,
        })
    }
}
