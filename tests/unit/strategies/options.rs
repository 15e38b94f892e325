//! Unit tests for the options strategy classifier

use cyclewatch::config::VolatilityThresholds;
use cyclewatch::models::strategy::{Bias, BiasStrength, OptionsStrategy, VolRegime};
use cyclewatch::strategies::{select_strategy, OptionsClassifier};
use cyclewatch::CoreError;

#[test]
fn documented_examples() {
    let c = OptionsClassifier::default();

    let low = c.classify(10.0, Bias::Bullish, BiasStrength::Strong, None).unwrap();
    assert_eq!(low.strategy.label(), "Long Calls");
    assert_eq!(low.vol_regime, VolRegime::Low);

    let high = c.classify(90.0, Bias::Neutral, BiasStrength::Weak, None).unwrap();
    assert_eq!(high.strategy.label(), "Short Strangle");

    let normal = c.classify(50.0, Bias::Bullish, BiasStrength::Weak, None).unwrap();
    assert_eq!(normal.strategy.label(), "No Preference");
}

#[test]
fn decision_table() {
    use BiasStrength::*;
    use OptionsStrategy::*;

    let table = [
        (VolRegime::Low, Bias::Bullish, Strong, LongCalls),
        (VolRegime::Low, Bias::Bearish, Weak, LongPuts),
        (VolRegime::Low, Bias::Neutral, Weak, LongStraddle),
        (VolRegime::High, Bias::Bullish, Weak, ShortPuts),
        (VolRegime::High, Bias::Bearish, Strong, ShortCalls),
        (VolRegime::High, Bias::Neutral, Weak, ShortStrangle),
        (VolRegime::Normal, Bias::Bullish, Strong, ModerateStrategies),
        (VolRegime::Normal, Bias::Bearish, Strong, ModerateStrategies),
        (VolRegime::Normal, Bias::Bearish, Weak, NoPreference),
        (VolRegime::Normal, Bias::Neutral, Strong, NoPreference),
    ];

    for (regime, bias, strength, expected) in table {
        assert_eq!(
            select_strategy(regime, bias, strength),
            expected,
            "{:?} {:?} {:?}",
            regime,
            bias,
            strength
        );
    }
}

#[test]
fn regime_boundaries_are_normal() {
    let c = OptionsClassifier::default();
    assert_eq!(c.vol_regime(0.0).unwrap(), VolRegime::Low);
    assert_eq!(c.vol_regime(24.9).unwrap(), VolRegime::Low);
    assert_eq!(c.vol_regime(25.0).unwrap(), VolRegime::Normal);
    assert_eq!(c.vol_regime(75.0).unwrap(), VolRegime::Normal);
    assert_eq!(c.vol_regime(75.1).unwrap(), VolRegime::High);
    assert_eq!(c.vol_regime(100.0).unwrap(), VolRegime::High);
}

#[test]
fn custom_thresholds_move_the_regimes() {
    let c = OptionsClassifier::new(VolatilityThresholds {
        low_below: 40.0,
        high_above: 60.0,
    });
    assert_eq!(c.vol_regime(30.0).unwrap(), VolRegime::Low);
    assert_eq!(c.vol_regime(65.0).unwrap(), VolRegime::High);
}

#[test]
fn iv_rank_outside_range_is_rejected() {
    let c = OptionsClassifier::default();
    for bad in [-1.0, 100.5, f64::NAN] {
        assert!(matches!(
            c.classify(bad, Bias::Bullish, BiasStrength::Strong, None),
            Err(CoreError::InvalidInput(_))
        ));
    }
}

#[test]
fn conflict_rule_is_caller_supplied() {
    let c = OptionsClassifier::default().with_conflict_rule(|iv: f64, bias: Bias, trend: f64| {
        iv > 75.0 && bias == Bias::Bearish && trend > 10.0
    });

    let flagged = c
        .classify(80.0, Bias::Bearish, BiasStrength::Strong, Some(25.0))
        .unwrap();
    assert_eq!(flagged.strategy, OptionsStrategy::ShortCalls);
    assert!(flagged.conflict);

    let calm = c
        .classify(80.0, Bias::Bearish, BiasStrength::Strong, Some(2.0))
        .unwrap();
    assert!(!calm.conflict);

    let no_trend = c.classify(80.0, Bias::Bearish, BiasStrength::Strong, None).unwrap();
    assert!(!no_trend.conflict);
}

#[test]
fn default_rule_never_conflicts() {
    let c = OptionsClassifier::default();
    let rec = c
        .classify(99.0, Bias::Bullish, BiasStrength::Strong, Some(500.0))
        .unwrap();
    assert!(!rec.conflict);
}

#[test]
fn strategies_serialize_as_snake_case() {
    let json = serde_json::to_string(&OptionsStrategy::ShortStrangle).unwrap();
    assert_eq!(json, "\"short_strangle\"");
    assert_eq!(OptionsStrategy::ModerateStrategies.to_string(), "Moderate Strategies");
}
