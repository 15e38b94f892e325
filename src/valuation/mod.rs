//! Ballistic fair-value model for MSTR against the BTC price.
//!
//! ln(fair) = A + B * ln(btc) + C * ln(btc)^2

use crate::error::{CoreError, Result};
use crate::models::valuation::{ValuationBand, ValuationResult};

pub const INTERCEPT: f64 = 51.293498;
pub const LINEAR: f64 = -10.676635;
pub const QUADRATIC: f64 = 0.586628;

/// Natural log of the model price for a reference price.
pub fn ln_fair_value(reference_price: f64) -> Result<f64> {
    if !reference_price.is_finite() || reference_price <= 0.0 {
        return Err(CoreError::invalid(format!(
            "reference price must be positive, got {}",
            reference_price
        )));
    }
    let ln_ref = reference_price.ln();
    Ok(INTERCEPT + LINEAR * ln_ref + QUADRATIC * ln_ref * ln_ref)
}

pub fn fair_value(reference_price: f64) -> Result<f64> {
    ln_fair_value(reference_price).map(f64::exp)
}

/// `(actual - model) / model * 100`
pub fn deviation_pct(actual: f64, model: f64) -> Result<f64> {
    if !model.is_finite() || model <= 0.0 {
        return Err(CoreError::invalid(format!(
            "model price must be positive, got {}",
            model
        )));
    }
    if !actual.is_finite() || actual <= 0.0 {
        return Err(CoreError::invalid(format!(
            "actual price must be positive, got {}",
            actual
        )));
    }
    Ok((actual - model) / model * 100.0)
}

pub fn classify_deviation(actual: f64, model: f64) -> Result<ValuationBand> {
    deviation_pct(actual, model).map(ValuationBand::from_deviation_pct)
}

/// Full valuation of `actual_price` against the model at `reference_price`.
pub fn evaluate(reference_price: f64, actual_price: f64) -> Result<ValuationResult> {
    let model_price = fair_value(reference_price)?;
    let deviation = deviation_pct(actual_price, model_price)?;

    Ok(ValuationResult {
        model_price,
        actual_price,
        deviation_pct: deviation,
        band: ValuationBand::from_deviation_pct(deviation),
    })
}
