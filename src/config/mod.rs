//! Environment-driven configuration.
//!
//! Binaries call `dotenvy::dotenv()` first, then build a [`Config`] with
//! [`Config::from_env`]. Every field has a default so tests can use
//! `Config::default()` directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

use crate::error::{CoreError, Result};

/// Current deployment environment (`APP_ENV`), lowercased.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

pub fn get_database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| {
        "host=localhost port=5432 user=postgres password=postgres dbname=cyclewatch".to_string()
    })
}

fn env_or<T: FromStr + Display>(key: &str, default: T) -> T {
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(_) => return default,
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key = key, value = %raw, default = %default, "Unparseable setting, using default");
            default
        }
    }
}

fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key = key, value = %raw, "Unparseable setting, ignoring");
    }
    parsed
}

/// A value supplied out of band applies only to the day it was observed.
fn as_of(value: Option<f64>, observed_on: Option<NaiveDate>, date: NaiveDate) -> Option<f64> {
    value.filter(|_| observed_on == Some(date))
}

/// Grace windows (in days) during which an active signal survives a failing
/// raw condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePeriods {
    pub btc_buy: i64,
    pub btc_sell: i64,
    pub pi_cycle_top: i64,
}

impl GracePeriods {
    pub fn validate(&self) -> Result<()> {
        for (key, days) in [
            ("BTC_BUY_GRACE_DAYS", self.btc_buy),
            ("BTC_SELL_GRACE_DAYS", self.btc_sell),
            ("PI_CYCLE_GRACE_DAYS", self.pi_cycle_top),
        ] {
            if days < 0 {
                return Err(CoreError::invalid(format!(
                    "{} must not be negative, got {}",
                    key, days
                )));
            }
        }
        Ok(())
    }
}

impl Default for GracePeriods {
    fn default() -> Self {
        Self {
            btc_buy: 30,
            btc_sell: 30,
            pi_cycle_top: 30,
        }
    }
}

/// Raw-condition thresholds for the BTC buy/sell signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub buy_mvrv_below: f64,
    pub buy_rsi_below: f64,
    pub sell_mvrv_above: f64,
    pub sell_rsi_above: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            buy_mvrv_below: 1.0,
            buy_rsi_below: 30.0,
            sell_mvrv_above: 3.0,
            sell_rsi_above: 70.0,
        }
    }
}

/// IV-rank bounds separating the Low / Normal / High volatility regimes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityThresholds {
    pub low_below: f64,
    pub high_above: f64,
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self {
            low_below: 25.0,
            high_above: 75.0,
        }
    }
}

/// Indicator windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPeriods {
    pub ema: usize,
    pub rsi: usize,
    pub trend_lookback: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            ema: 200,
            rsi: 14,
            trend_lookback: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub grace: GracePeriods,
    pub thresholds: SignalThresholds,
    pub volatility: VolatilityThresholds,
    pub periods: IndicatorPeriods,
    pub btc_symbol: String,
    pub mstr_symbol: String,
    pub price_history_days: u32,
    pub eval_cron: String,
    pub polygon_api_key: Option<String>,
    pub polygon_base_url: String,
    pub coingecko_base_url: String,
    /// Externally sourced MVRV ratio and the date it was observed.
    pub btc_mvrv: Option<f64>,
    pub btc_mvrv_date: Option<NaiveDate>,
    /// Externally sourced MSTR IV rank (0-100) and the date it was observed.
    pub mstr_iv_rank: Option<f64>,
    pub mstr_iv_rank_date: Option<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grace: GracePeriods::default(),
            thresholds: SignalThresholds::default(),
            volatility: VolatilityThresholds::default(),
            periods: IndicatorPeriods::default(),
            btc_symbol: "X:BTCUSD".to_string(),
            mstr_symbol: "MSTR".to_string(),
            price_history_days: 450,
            eval_cron: "0 0 6 * * *".to_string(),
            polygon_api_key: None,
            polygon_base_url: "https://api.polygon.io".to_string(),
            coingecko_base_url: "https://api.coingecko.com".to_string(),
            btc_mvrv: None,
            btc_mvrv_date: None,
            mstr_iv_rank: None,
            mstr_iv_rank_date: None,
        }
    }
}

impl Config {
    /// Read every setting from the environment. Unparseable values fall back
    /// to their defaults with a warning; negative grace windows are rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            grace: GracePeriods {
                btc_buy: env_or("BTC_BUY_GRACE_DAYS", defaults.grace.btc_buy),
                btc_sell: env_or("BTC_SELL_GRACE_DAYS", defaults.grace.btc_sell),
                pi_cycle_top: env_or("PI_CYCLE_GRACE_DAYS", defaults.grace.pi_cycle_top),
            },
            thresholds: SignalThresholds {
                buy_mvrv_below: env_or("BUY_MVRV_BELOW", defaults.thresholds.buy_mvrv_below),
                buy_rsi_below: env_or("BUY_RSI_BELOW", defaults.thresholds.buy_rsi_below),
                sell_mvrv_above: env_or("SELL_MVRV_ABOVE", defaults.thresholds.sell_mvrv_above),
                sell_rsi_above: env_or("SELL_RSI_ABOVE", defaults.thresholds.sell_rsi_above),
            },
            volatility: VolatilityThresholds {
                low_below: env_or("IV_LOW_BELOW", defaults.volatility.low_below),
                high_above: env_or("IV_HIGH_ABOVE", defaults.volatility.high_above),
            },
            periods: IndicatorPeriods {
                trend_lookback: env_or("TREND_LOOKBACK_DAYS", defaults.periods.trend_lookback),
                ..defaults.periods
            },
            btc_symbol: env::var("BTC_SYMBOL").unwrap_or(defaults.btc_symbol),
            mstr_symbol: env::var("MSTR_SYMBOL").unwrap_or(defaults.mstr_symbol),
            price_history_days: env_or("PRICE_HISTORY_DAYS", defaults.price_history_days),
            eval_cron: env::var("EVAL_CRON").unwrap_or(defaults.eval_cron),
            polygon_api_key: env::var("POLYGON_API_KEY").ok().filter(|k| !k.is_empty()),
            polygon_base_url: env::var("POLYGON_BASE_URL").unwrap_or(defaults.polygon_base_url),
            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .unwrap_or(defaults.coingecko_base_url),
            btc_mvrv: env_opt("BTC_MVRV"),
            btc_mvrv_date: env_opt("BTC_MVRV_DATE"),
            mstr_iv_rank: env_opt("MSTR_IV_RANK"),
            mstr_iv_rank_date: env_opt("MSTR_IV_RANK_DATE"),
        };

        config.grace.validate()?;
        Ok(config)
    }

    /// Configured MVRV, if it was observed on `date`.
    pub fn btc_mvrv_on(&self, date: NaiveDate) -> Option<f64> {
        as_of(self.btc_mvrv, self.btc_mvrv_date, date)
    }

    /// Configured IV rank, if it was observed on `date`.
    pub fn mstr_iv_rank_on(&self, date: NaiveDate) -> Option<f64> {
        as_of(self.mstr_iv_rank, self.mstr_iv_rank_date, date)
    }
}
