use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalName {
    BtcBuy,
    BtcSell,
    PiCycleTop,
}

impl SignalName {
    pub const ALL: [SignalName; 3] = [Self::BtcBuy, Self::BtcSell, Self::PiCycleTop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BtcBuy => "btc_buy",
            Self::BtcSell => "btc_sell",
            Self::PiCycleTop => "pi_cycle_top",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "btc_buy" => Ok(Self::BtcBuy),
            "btc_sell" => Ok(Self::BtcSell),
            "pi_cycle_top" => Ok(Self::PiCycleTop),
            other => Err(CoreError::invalid(format!("unknown signal name '{}'", other))),
        }
    }
}

/// Today's raw trigger condition for a signal.
///
/// `Unknown` means an input was missing; the state machine leaves the state
/// untouched and flags the evaluation as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawCondition {
    Met,
    NotMet,
    Unknown,
}

impl From<bool> for RawCondition {
    fn from(met: bool) -> Self {
        if met {
            Self::Met
        } else {
            Self::NotMet
        }
    }
}

impl From<Option<bool>> for RawCondition {
    fn from(met: Option<bool>) -> Self {
        met.map(Self::from).unwrap_or(Self::Unknown)
    }
}

/// Persisted per-signal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    pub name: SignalName,
    pub active: bool,
    pub activated_on: Option<NaiveDate>,
    pub last_condition_met_on: Option<NaiveDate>,
    pub last_evaluated_on: Option<NaiveDate>,
    pub deactivated_on: Option<NaiveDate>,
    /// Start of the most recent activation once it has ended.
    #[serde(default)]
    pub last_activated_on: Option<NaiveDate>,
}

impl SignalState {
    pub fn inactive(name: SignalName) -> Self {
        Self {
            name,
            active: false,
            activated_on: None,
            last_condition_met_on: None,
            last_evaluated_on: None,
            deactivated_on: None,
            last_activated_on: None,
        }
    }

    /// Days the signal has been active as of `today`, or the length of its
    /// last activation once it has turned off.
    pub fn days_active(&self, today: NaiveDate) -> i64 {
        if self.active {
            return self
                .activated_on
                .map_or(0, |start| (today - start).num_days());
        }
        match (self.last_activated_on, self.deactivated_on) {
            (Some(start), Some(end)) => (end - start).num_days(),
            _ => 0,
        }
    }
}

/// What one evaluation did to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    Activated,
    /// Condition held (or re-held) while already active.
    Sustained,
    /// Condition failed but the grace window absorbs it.
    Held { days_since_condition_met: i64 },
    Deactivated { days_since_condition_met: i64 },
    Unchanged,
    /// Raw condition unavailable; nothing updated.
    Stale,
    /// Date already processed; nothing updated.
    AlreadyEvaluated,
}

/// Display status derived from state + today's raw condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Active,
    Weakening,
    RecentlyOff,
    None,
}

impl SignalStatus {
    pub fn derive(state: &SignalState, condition: RawCondition) -> Self {
        if state.active {
            match condition {
                RawCondition::NotMet => Self::Weakening,
                _ => Self::Active,
            }
        } else if state.deactivated_on.is_some() {
            Self::RecentlyOff
        } else {
            Self::None
        }
    }
}
