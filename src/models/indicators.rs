use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: usize,
    /// Number of weekly closes the value was computed from.
    pub weeks: usize,
}

/// Distance of the 111DMA from 2x the 350DMA, bucketed for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiCycleProximity {
    Active,
    Imminent,
    VeryClose,
    Approaching,
    Moderate,
    Far,
}

impl PiCycleProximity {
    /// Bucket a `gap_pct` (negative while the 111DMA is below 2x350DMA).
    pub fn from_gap_pct(gap_pct: f64) -> Self {
        if gap_pct >= 0.0 {
            return Self::Active;
        }
        let distance = -gap_pct;
        if distance <= 1.0 {
            Self::Imminent
        } else if distance <= 3.0 {
            Self::VeryClose
        } else if distance <= 7.0 {
            Self::Approaching
        } else if distance <= 15.0 {
            Self::Moderate
        } else {
            Self::Far
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceTrend {
    RapidlyConverging,
    Converging,
    Stable,
    Diverging,
}

/// Average daily change of the absolute gap `ma350x2 - ma111`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PiCycleTrend {
    pub trend: ConvergenceTrend,
    pub daily_rate: f64,
}

impl PiCycleTrend {
    pub fn from_daily_rate(daily_rate: f64) -> Self {
        let trend = if daily_rate < -50.0 {
            ConvergenceTrend::RapidlyConverging
        } else if daily_rate < -10.0 {
            ConvergenceTrend::Converging
        } else if daily_rate < 10.0 {
            ConvergenceTrend::Stable
        } else {
            ConvergenceTrend::Diverging
        };
        Self { trend, daily_rate }
    }

    pub fn is_converging(&self) -> bool {
        self.daily_rate < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PiCycleReading {
    pub ma111: f64,
    pub ma350x2: f64,
    pub gap_pct: f64,
}

impl PiCycleReading {
    pub fn is_triggered(&self) -> bool {
        self.ma111 >= self.ma350x2
    }

    pub fn proximity(&self) -> PiCycleProximity {
        PiCycleProximity::from_gap_pct(self.gap_pct)
    }
}

/// Bull when price sits at or above the 200-day EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Bull,
    Bear,
}

impl MarketRegime {
    pub fn classify(price: f64, ema200: f64) -> Self {
        if price >= ema200 {
            Self::Bull
        } else {
            Self::Bear
        }
    }
}

/// Indicator values for one run. Each field is independently optional:
/// a missing value means that indicator had insufficient data today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub price: Option<f64>,
    pub ema200: Option<f64>,
    pub weekly_rsi: Option<f64>,
    pub mvrv: Option<f64>,
    pub pi_cycle: Option<PiCycleReading>,
    pub pi_cycle_trend: Option<PiCycleTrend>,
}

impl IndicatorReading {
    pub fn market_regime(&self) -> Option<MarketRegime> {
        Some(MarketRegime::classify(self.price?, self.ema200?))
    }

    /// Percent distance of price from the 200-day EMA.
    pub fn price_vs_ema_pct(&self) -> Option<f64> {
        let (price, ema) = (self.price?, self.ema200?);
        if ema > 0.0 {
            Some((price - ema) / ema * 100.0)
        } else {
            None
        }
    }
}
