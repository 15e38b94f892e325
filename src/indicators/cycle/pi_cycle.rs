//! Pi-Cycle Top: 111-day SMA against twice the 350-day SMA.

use crate::error::{CoreError, Result};
use crate::indicators::math;
use crate::models::indicators::{PiCycleReading, PiCycleTrend};

pub const FAST_PERIOD: usize = 111;
pub const SLOW_PERIOD: usize = 350;
pub const SLOW_MULTIPLIER: f64 = 2.0;

/// Current Pi-Cycle reading; needs at least 350 daily closes.
pub fn pi_cycle(series: &[f64]) -> Result<PiCycleReading> {
    if series.len() < SLOW_PERIOD {
        return Err(CoreError::insufficient("pi_cycle", SLOW_PERIOD, series.len()));
    }

    let ma111 = math::sma(series, FAST_PERIOD)
        .ok_or(CoreError::insufficient("pi_cycle", FAST_PERIOD, series.len()))?;
    let ma350x2 = math::sma(series, SLOW_PERIOD)
        .ok_or(CoreError::insufficient("pi_cycle", SLOW_PERIOD, series.len()))?
        * SLOW_MULTIPLIER;

    if ma350x2 <= 0.0 {
        return Err(CoreError::invalid("pi_cycle: non-positive 350-day average"));
    }

    Ok(PiCycleReading {
        ma111,
        ma350x2,
        gap_pct: (ma111 - ma350x2) / ma350x2 * 100.0,
    })
}

/// Absolute gap `ma350x2 - ma111` for every day where both averages exist.
pub fn gap_history(series: &[f64]) -> Vec<f64> {
    let fast = math::rolling_sma(series, FAST_PERIOD);
    let slow = math::rolling_sma(series, SLOW_PERIOD);
    fast.iter()
        .zip(&slow)
        .filter_map(|(f, s)| Some((*s)? * SLOW_MULTIPLIER - (*f)?))
        .collect()
}

/// Average daily change of the gap over the trailing `lookback` days.
pub fn pi_cycle_trend(series: &[f64], lookback: usize) -> Result<PiCycleTrend> {
    if lookback < 2 {
        return Err(CoreError::invalid("pi_cycle_trend lookback must be >= 2"));
    }
    let gaps = gap_history(series);
    if gaps.len() < lookback {
        return Err(CoreError::insufficient(
            "pi_cycle_trend",
            SLOW_PERIOD + lookback - 1,
            series.len(),
        ));
    }

    let window = &gaps[gaps.len() - lookback..];
    let daily_rate = (window[lookback - 1] - window[0]) / (lookback - 1) as f64;
    Ok(PiCycleTrend::from_daily_rate(daily_rate))
}
