//! Raw trigger conditions computed from the day's indicator reading.
//!
//! Conditions are three-valued conjunctions: any known-false term makes the
//! condition `NotMet`; otherwise a missing term makes it `Unknown`.

use crate::config::SignalThresholds;
use crate::models::indicators::IndicatorReading;
use crate::models::signal::{RawCondition, SignalName};

fn all_of(terms: &[Option<bool>]) -> RawCondition {
    if terms.iter().any(|t| *t == Some(false)) {
        RawCondition::NotMet
    } else if terms.iter().any(Option::is_none) {
        RawCondition::Unknown
    } else {
        RawCondition::Met
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator {
    thresholds: SignalThresholds,
}

impl ConditionEvaluator {
    pub fn new(thresholds: SignalThresholds) -> Self {
        Self { thresholds }
    }

    /// Bear market capitulation: price < EMA200, MVRV and weekly RSI low.
    pub fn btc_buy(&self, reading: &IndicatorReading) -> RawCondition {
        let below_ema = reading
            .price
            .zip(reading.ema200)
            .map(|(price, ema)| price < ema);
        all_of(&[
            below_ema,
            reading.mvrv.map(|m| m < self.thresholds.buy_mvrv_below),
            reading.weekly_rsi.map(|r| r < self.thresholds.buy_rsi_below),
        ])
    }

    /// Bull market euphoria: price >= EMA200, MVRV and weekly RSI high.
    pub fn btc_sell(&self, reading: &IndicatorReading) -> RawCondition {
        let above_ema = reading
            .price
            .zip(reading.ema200)
            .map(|(price, ema)| price >= ema);
        all_of(&[
            above_ema,
            reading.mvrv.map(|m| m > self.thresholds.sell_mvrv_above),
            reading.weekly_rsi.map(|r| r > self.thresholds.sell_rsi_above),
        ])
    }

    pub fn pi_cycle_top(&self, reading: &IndicatorReading) -> RawCondition {
        reading.pi_cycle.map(|p| p.is_triggered()).into()
    }

    pub fn evaluate(&self, name: SignalName, reading: &IndicatorReading) -> RawCondition {
        match name {
            SignalName::BtcBuy => self.btc_buy(reading),
            SignalName::BtcSell => self.btc_sell(reading),
            SignalName::PiCycleTop => self.pi_cycle_top(reading),
        }
    }
}
