//! Unit tests for the daily evaluation engine

use crate::fixtures::{day, inputs_for, linear, pi_cycle_cross_series, series_from};
use chrono::Duration;
use cyclewatch::config::Config;
use cyclewatch::models::alert::AlertKind;
use cyclewatch::models::price::PricePoint;
use cyclewatch::models::signal::{RawCondition, SignalName, SignalState, SignalStatus, Transition};
use cyclewatch::models::strategy::{Bias, OptionsStrategy};
use cyclewatch::signals::{InMemoryStateStore, SignalEngine, StateStore};
use cyclewatch::CoreError;

fn engine() -> SignalEngine {
    SignalEngine::new(Config::default())
}

#[test]
fn full_history_produces_every_indicator() {
    let inputs = inputs_for(&linear(400, 20_000.0, 100.0), Some(2.0), &vec![300.0; 40], Some(50.0));
    let evaluation = engine()
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();

    let r = &evaluation.indicators;
    assert_eq!(r.price, Some(59_900.0));
    assert!(r.ema200.is_some());
    assert!(r.weekly_rsi.is_some());
    assert!(r.pi_cycle.is_some());
    assert!(r.pi_cycle_trend.is_some());
    assert!(evaluation.errors.is_empty(), "{:?}", evaluation.errors);
    assert!(evaluation.data_quality.is_complete());
    assert_eq!(evaluation.signals.len(), 3);
    assert!(evaluation.valuation.is_some());
    assert!(evaluation.strategy.is_some());
}

#[test]
fn evaluating_the_same_day_twice_is_idempotent() {
    let e = engine();
    let mut store = InMemoryStateStore::new();
    let inputs = inputs_for(&pi_cycle_cross_series(12), None, &[], None);

    e.evaluate_daily(&inputs, &mut store).unwrap();
    let after_first = store.states();
    let second = e.evaluate_daily(&inputs, &mut store).unwrap();

    assert_eq!(store.states(), after_first);
    for report in &second.signals {
        assert!(matches!(
            report.transition,
            Transition::AlreadyEvaluated | Transition::Stale
        ));
    }
}

#[test]
fn pi_cycle_top_activates_exactly_on_crossing_day() {
    let e = engine();
    let mut store = InMemoryStateStore::new();

    for jump_days in 0..=12 {
        let inputs = inputs_for(&pi_cycle_cross_series(jump_days), None, &[], None);
        let evaluation = e.evaluate_daily(&inputs, &mut store).unwrap();
        let report = evaluation.signal(SignalName::PiCycleTop).unwrap();

        match jump_days {
            0..=9 => {
                assert!(!report.state.active, "active too early at {}", jump_days);
                assert_eq!(report.transition, Transition::Unchanged);
            }
            10 => {
                assert_eq!(report.transition, Transition::Activated);
                assert_eq!(report.state.activated_on, Some(inputs.date));
                assert!(evaluation
                    .alerts
                    .iter()
                    .any(|a| a.kind == AlertKind::SignalActivated(SignalName::PiCycleTop)));
            }
            _ => assert_eq!(report.transition, Transition::Sustained),
        }
    }
}

#[test]
fn missing_mvrv_marks_btc_signals_stale_without_touching_state() {
    // Rising market: price above EMA, so only the sell condition is undecided
    let inputs = inputs_for(&linear(400, 20_000.0, 100.0), None, &[], None);
    let mut store = InMemoryStateStore::new();
    let evaluation = engine().evaluate_daily(&inputs, &mut store).unwrap();

    let sell = evaluation.signal(SignalName::BtcSell).unwrap();
    assert_eq!(sell.condition, RawCondition::Unknown);
    assert!(sell.stale);
    assert!(store.get(SignalName::BtcSell).is_none());

    let buy = evaluation.signal(SignalName::BtcBuy).unwrap();
    assert_eq!(buy.condition, RawCondition::NotMet);
    assert!(!buy.stale);
    assert!(!evaluation.data_quality.btc_valid());
}

#[test]
fn short_history_skips_indicators_but_not_the_run() {
    let inputs = inputs_for(&linear(250, 20_000.0, 10.0), Some(2.0), &[], None);
    let evaluation = engine()
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();

    assert!(evaluation.indicators.ema200.is_some());
    assert!(evaluation.indicators.pi_cycle.is_none());
    assert!(evaluation.errors.iter().any(|e| e.contains("pi_cycle")));
    let pi = evaluation.signal(SignalName::PiCycleTop).unwrap();
    assert!(pi.stale);
}

#[test]
fn invalid_btc_prices_abort_btc_only() {
    let mut closes = linear(400, 20_000.0, 100.0);
    closes[100] = -1.0;
    let inputs = inputs_for(&closes, Some(2.0), &vec![300.0; 40], Some(50.0));

    let evaluation = engine()
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();

    assert!(evaluation.signals.iter().all(|s| s.stale));
    assert!(evaluation.errors.iter().any(|e| e.starts_with("BTC")));
    assert!(evaluation.alerts.iter().any(|a| a.kind == AlertKind::DataError));
    // MSTR needs the BTC reference price, so it reports its own error
    assert!(evaluation.valuation.is_none());
}

#[test]
fn missing_mstr_data_does_not_block_btc_signals() {
    let inputs = inputs_for(&pi_cycle_cross_series(10), Some(2.0), &[], Some(50.0));
    let evaluation = engine()
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();

    assert!(evaluation.valuation.is_none());
    assert!(evaluation.strategy.is_none());
    assert!(evaluation.errors.iter().any(|e| e.starts_with("MSTR")));
    assert!(evaluation.signal(SignalName::PiCycleTop).unwrap().state.active);
}

#[test]
fn strategy_uses_valuation_bias_and_iv_rank() {
    // BTC at 60000: model price ~126.11, MSTR at 60 is severely undervalued
    let inputs = inputs_for(&vec![60_000.0; 400], Some(2.0), &vec![60.0; 40], Some(10.0));

    let evaluation = engine()
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();

    let strategy = evaluation.strategy.unwrap();
    assert_eq!(strategy.bias, Bias::Bullish);
    assert_eq!(strategy.strategy, OptionsStrategy::LongCalls);
    assert!(!strategy.conflict);
    assert!(evaluation
        .alerts
        .iter()
        .any(|a| a.kind == AlertKind::MstrUndervalued));
}

#[test]
fn conflict_rule_sees_recent_mstr_trend() {
    let btc = vec![60_000.0; 400];
    // MSTR rallying hard while severely undervalued and IV is high
    let mstr = linear(40, 30.0, 1.0);
    let inputs = inputs_for(&btc, Some(2.0), &mstr, Some(90.0));

    let e = SignalEngine::new(Config::default())
        .with_conflict_rule(|iv: f64, bias: Bias, trend: f64| iv > 75.0 && bias == Bias::Bullish && trend > 20.0);
    let evaluation = e.evaluate_daily(&inputs, &mut InMemoryStateStore::new()).unwrap();

    let strategy = evaluation.strategy.unwrap();
    assert_eq!(strategy.strategy, OptionsStrategy::ShortPuts);
    assert!(strategy.conflict);
}

#[test]
fn corrupt_persisted_state_aborts_the_run() {
    let mut corrupt = SignalState::inactive(SignalName::BtcBuy);
    corrupt.active = true;
    let mut store = InMemoryStateStore::from_states([corrupt]);

    let inputs = inputs_for(&linear(400, 20_000.0, 100.0), Some(2.0), &[], None);
    let result = engine().evaluate_daily(&inputs, &mut store);
    assert!(matches!(result, Err(CoreError::StateCorruption { .. })));
}

#[test]
fn corrupt_later_signal_leaves_earlier_signals_unsaved() {
    let mut corrupt = SignalState::inactive(SignalName::PiCycleTop);
    corrupt.activated_on = Some(day(10));
    let mut store = InMemoryStateStore::from_states([corrupt.clone()]);

    // BTC buy and sell both evaluate NotMet here, which would stamp
    // last_evaluated_on if they were saved.
    let inputs = inputs_for(&linear(400, 20_000.0, 100.0), Some(2.0), &[], None);
    let result = engine().evaluate_daily(&inputs, &mut store);

    assert!(matches!(
        result,
        Err(CoreError::StateCorruption { ref signal, .. }) if signal == "pi_cycle_top"
    ));
    assert_eq!(store.states(), vec![corrupt]);
    assert!(store.get(SignalName::BtcBuy).is_none());
    assert!(store.get(SignalName::BtcSell).is_none());
}

#[test]
fn prices_after_the_evaluation_date_are_ignored() {
    let e = engine();
    let mut store = InMemoryStateStore::new();

    // The crossing lands on day 359; evaluating day 354 with the later
    // closes still attached must not see it.
    let mut inputs = inputs_for(&pi_cycle_cross_series(10), None, &[], None);
    assert_eq!(inputs.date, day(359));
    inputs.date = day(354);

    let evaluation = e.evaluate_daily(&inputs, &mut store).unwrap();
    let pi = evaluation.signal(SignalName::PiCycleTop).unwrap();
    assert_eq!(pi.condition, RawCondition::NotMet);
    assert_eq!(pi.transition, Transition::Unchanged);
    assert!(!pi.state.active);
    assert_eq!(evaluation.indicators.price, Some(3300.0));
    assert!(!evaluation.indicators.pi_cycle.unwrap().is_triggered());

    let mut next = inputs_for(&pi_cycle_cross_series(10), None, &[], None);
    next.date = day(359);
    let evaluation = e.evaluate_daily(&next, &mut store).unwrap();
    let pi = evaluation.signal(SignalName::PiCycleTop).unwrap();
    assert_eq!(pi.transition, Transition::Activated);
    assert_eq!(pi.state.activated_on, Some(day(359)));
}

#[test]
fn mstr_closes_after_the_evaluation_date_are_ignored() {
    let mut inputs = inputs_for(&linear(400, 20_000.0, 100.0), Some(2.0), &[300.0; 40], Some(50.0));
    let date = inputs.date;
    inputs.mstr_prices.push(PricePoint::new(date + Duration::days(1), 900.0));

    let e = engine();
    let valuation = e
        .evaluate_valuation(&e.compute_indicators(&inputs).unwrap().0, &inputs)
        .unwrap();
    assert_eq!(valuation.actual_price, 300.0);

    // Nothing on or before the date at all is a data error, not a lookahead.
    inputs.mstr_prices = series_from(date + Duration::days(1), &[300.0; 5]);
    let evaluation = e
        .evaluate_daily(&inputs, &mut InMemoryStateStore::new())
        .unwrap();
    assert!(evaluation.valuation.is_none());
    assert!(evaluation.errors.iter().any(|m| m.starts_with("MSTR:")));
}

#[test]
fn weakening_status_during_grace_period() {
    let e = engine();
    let mut store = InMemoryStateStore::from_states([SignalState {
        name: SignalName::PiCycleTop,
        active: true,
        activated_on: Some(day(300)),
        last_condition_met_on: Some(day(390)),
        last_evaluated_on: Some(day(390)),
        deactivated_on: None,
        last_activated_on: None,
    }]);

    let inputs = inputs_for(&vec![100.0; 400], None, &[], None);
    assert_eq!(inputs.date, day(399));
    let evaluation = e.evaluate_daily(&inputs, &mut store).unwrap();
    let pi = evaluation.signal(SignalName::PiCycleTop).unwrap();

    assert_eq!(
        pi.transition,
        Transition::Held {
            days_since_condition_met: 9
        }
    );
    assert_eq!(pi.status, SignalStatus::Weakening);
    assert_eq!(pi.days_active, 99);
    assert!(store.load_state(SignalName::PiCycleTop).unwrap().active);
}

#[test]
fn recent_trend_needs_lookback_plus_one_points() {
    let e = engine();
    assert_eq!(e.recent_trend_pct(&series_from(day(0), &vec![10.0; 30])), None);
    let trend = e
        .recent_trend_pct(&series_from(day(0), &linear(31, 100.0, 1.0)))
        .unwrap();
    assert!((trend - 30.0).abs() < 1e-9);
}
