//! Inputs and outputs of one daily evaluation cycle

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::indicators::IndicatorReading;
use super::price::PricePoint;
use super::signal::{RawCondition, SignalState, SignalStatus, Transition};
use super::strategy::StrategyRecommendation;
use super::valuation::ValuationResult;

/// Everything the core needs for one run, already fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyInputs {
    pub date: NaiveDate,
    /// Ascending daily BTC closes; the last close is today's reference price.
    pub btc_prices: Vec<PricePoint>,
    pub btc_mvrv: Option<f64>,
    /// Ascending daily MSTR closes; the last close is the actual price.
    #[serde(default)]
    pub mstr_prices: Vec<PricePoint>,
    pub mstr_iv_rank: Option<f64>,
}

impl DailyInputs {
    /// BTC closes dated on or before `date`.
    pub fn btc_history(&self) -> &[PricePoint] {
        as_of(&self.btc_prices, self.date)
    }

    /// MSTR closes dated on or before `date`.
    pub fn mstr_history(&self) -> &[PricePoint] {
        as_of(&self.mstr_prices, self.date)
    }

    pub fn btc_price(&self) -> Option<f64> {
        self.btc_history().last().map(|p| p.close)
    }

    pub fn mstr_price(&self) -> Option<f64> {
        self.mstr_history().last().map(|p| p.close)
    }
}

// Series are ascending, so the cut is a binary search.
fn as_of(prices: &[PricePoint], date: NaiveDate) -> &[PricePoint] {
    &prices[..prices.partition_point(|p| p.timestamp <= date)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub state: SignalState,
    pub condition: RawCondition,
    pub transition: Transition,
    pub status: SignalStatus,
    pub days_active: i64,
    pub stale: bool,
}

/// Data-quality issues found in the day's inputs, per asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub btc_issues: Vec<String>,
    pub mstr_issues: Vec<String>,
}

impl DataQuality {
    pub fn btc_valid(&self) -> bool {
        self.btc_issues.is_empty()
    }

    pub fn mstr_valid(&self) -> bool {
        self.mstr_issues.is_empty()
    }

    /// Reporting sends only when every asset passed validation.
    pub fn is_complete(&self) -> bool {
        self.btc_valid() && self.mstr_valid()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEvaluation {
    pub date: NaiveDate,
    pub indicators: IndicatorReading,
    pub valuation: Option<ValuationResult>,
    pub signals: Vec<SignalReport>,
    pub strategy: Option<StrategyRecommendation>,
    pub alerts: Vec<Alert>,
    pub data_quality: DataQuality,
    /// Per-asset failures that aborted part of the evaluation.
    pub errors: Vec<String>,
}

impl DailyEvaluation {
    pub fn signal(&self, name: super::signal::SignalName) -> Option<&SignalReport> {
        self.signals.iter().find(|r| r.state.name == name)
    }
}
