//! Moving-average primitives shared by the indicators.

/// Simple moving average of the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Rolling SMA aligned to `values`: entry `i` is the mean of
/// `values[i + 1 - period..=i]`, `None` until the window fills.
pub fn rolling_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Exponential moving average with smoothing `2 / (period + 1)`.
///
/// Seeded with the SMA of the first `period` values, then applied
/// recursively through the rest of the series.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let value = values[period..]
        .iter()
        .fold(seed, |prev, &x| alpha * x + (1.0 - alpha) * prev);
    Some(value)
}
