//! Unit tests for the ballistic valuation model

use cyclewatch::models::valuation::ValuationBand;
use cyclewatch::valuation::{classify_deviation, deviation_pct, evaluate, fair_value, ln_fair_value};
use cyclewatch::CoreError;

#[test]
fn worked_example_at_60000() {
    let ln = ln_fair_value(60_000.0).unwrap();
    assert!((ln - 4.837184512753765).abs() < 1e-6);

    let fair = fair_value(60_000.0).unwrap();
    assert!((fair - 126.11377967245981).abs() < 1e-6);
}

#[test]
fn regression_values_at_other_reference_prices() {
    assert!((ln_fair_value(100_000.0).unwrap() - 6.130242147150653).abs() < 1e-6);
    assert!((ln_fair_value(30_000.0).unwrap() - 3.572173505347898).abs() < 1e-6);
    assert!((fair_value(100_000.0).unwrap() - 459.54742530781266).abs() < 1e-6);
}

#[test]
fn non_positive_reference_is_invalid() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(ln_fair_value(bad), Err(CoreError::InvalidInput(_))));
    }
}

#[test]
fn band_boundaries_lean_to_the_extreme_side() {
    assert_eq!(ValuationBand::from_deviation_pct(-25.0), ValuationBand::SeverelyUndervalued);
    assert_eq!(ValuationBand::from_deviation_pct(-24.99), ValuationBand::Undervalued);
    assert_eq!(ValuationBand::from_deviation_pct(-15.0), ValuationBand::Undervalued);
    assert_eq!(ValuationBand::from_deviation_pct(-14.99), ValuationBand::Fair);
    assert_eq!(ValuationBand::from_deviation_pct(0.0), ValuationBand::Fair);
    assert_eq!(ValuationBand::from_deviation_pct(14.99), ValuationBand::Fair);
    assert_eq!(ValuationBand::from_deviation_pct(15.0), ValuationBand::Overvalued);
    assert_eq!(ValuationBand::from_deviation_pct(24.99), ValuationBand::Overvalued);
    assert_eq!(ValuationBand::from_deviation_pct(25.0), ValuationBand::SeverelyOvervalued);
}

#[test]
fn classify_deviation_uses_percent_of_model() {
    assert_eq!(classify_deviation(75.0, 100.0).unwrap(), ValuationBand::SeverelyUndervalued);
    assert_eq!(classify_deviation(115.0, 100.0).unwrap(), ValuationBand::Overvalued);
    assert!((deviation_pct(110.0, 100.0).unwrap() - 10.0).abs() < 1e-12);
    assert!(matches!(deviation_pct(110.0, 0.0), Err(CoreError::InvalidInput(_))));
    assert!(matches!(deviation_pct(-1.0, 100.0), Err(CoreError::InvalidInput(_))));
}

#[test]
fn evaluate_combines_model_and_band() {
    let rich = evaluate(60_000.0, 200.0).unwrap();
    assert!((rich.model_price - 126.11377967245981).abs() < 1e-6);
    assert!((rich.deviation_pct - 58.586952606952224).abs() < 1e-6);
    assert_eq!(rich.band, ValuationBand::SeverelyOvervalued);

    let cheap = evaluate(60_000.0, 100.0).unwrap();
    assert!((cheap.deviation_pct + 20.706523696523885).abs() < 1e-6);
    assert_eq!(cheap.band, ValuationBand::Undervalued);
}
