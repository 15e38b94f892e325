//! Daily evaluation engine: indicators, valuation, signal state and strategy
//! for one scheduled run.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::indicators::{calculate_ema, calculate_weekly_rsi, pi_cycle, pi_cycle_trend};
use crate::models::evaluation::{DailyEvaluation, DailyInputs, DataQuality, SignalReport};
use crate::models::indicators::IndicatorReading;
use crate::models::price::{closes, PricePoint};
use crate::models::signal::{SignalName, SignalStatus, Transition};
use crate::models::strategy::{bias_from_band, StrategyRecommendation};
use crate::models::valuation::ValuationResult;
use crate::signals::alerts;
use crate::signals::conditions::ConditionEvaluator;
use crate::signals::state_machine::SignalStateMachine;
use crate::signals::store::StateStore;
use crate::signals::validation;
use crate::strategies::options::{ConflictRule, OptionsClassifier};
use crate::valuation;

/// Keep an indicator value, or record why it was skipped for the day.
fn skip_if_insufficient<T>(result: Result<T>, notes: &mut Vec<String>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_insufficient_data() => {
            notes.push(e.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub struct SignalEngine {
    config: Config,
    machine: SignalStateMachine,
    conditions: ConditionEvaluator,
    classifier: OptionsClassifier,
}

impl SignalEngine {
    pub fn new(config: Config) -> Self {
        Self {
            machine: SignalStateMachine::new(config.grace),
            conditions: ConditionEvaluator::new(config.thresholds),
            classifier: OptionsClassifier::new(config.volatility),
            config,
        }
    }

    pub fn with_conflict_rule(mut self, rule: impl ConflictRule + 'static) -> Self {
        self.classifier = self.classifier.with_conflict_rule(rule);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// BTC indicator reading from closes dated on or before `inputs.date`.
    /// Invalid input aborts; indicators without enough history are left
    /// empty and noted.
    pub fn compute_indicators(
        &self,
        inputs: &DailyInputs,
    ) -> Result<(IndicatorReading, Vec<String>)> {
        validation::validate_price_series("BTC", &inputs.btc_prices)?;
        if let Some(mvrv) = inputs.btc_mvrv {
            if !mvrv.is_finite() || mvrv <= 0.0 {
                return Err(CoreError::invalid(format!("BTC: invalid MVRV {}", mvrv)));
            }
        }

        let prices = inputs.btc_history();
        if prices.is_empty() {
            return Err(CoreError::invalid(format!(
                "BTC: no prices on or before {}",
                inputs.date
            )));
        }
        let series = closes(prices);
        let periods = &self.config.periods;
        let mut notes = Vec::new();

        let ema200 = skip_if_insufficient(calculate_ema(prices, periods.ema), &mut notes)?;
        let weekly_rsi =
            skip_if_insufficient(calculate_weekly_rsi(prices, periods.rsi), &mut notes)?;
        let pi = skip_if_insufficient(pi_cycle(&series), &mut notes)?;
        let pi_trend = if pi.is_some() {
            skip_if_insufficient(pi_cycle_trend(&series, periods.trend_lookback), &mut notes)?
        } else {
            None
        };

        let reading = IndicatorReading {
            price: inputs.btc_price(),
            ema200: ema200.map(|e| e.value),
            weekly_rsi: weekly_rsi.map(|r| r.value),
            mvrv: inputs.btc_mvrv,
            pi_cycle: pi,
            pi_cycle_trend: pi_trend,
        };
        Ok((reading, notes))
    }

    /// MSTR valuation against today's BTC close.
    pub fn evaluate_valuation(
        &self,
        reading: &IndicatorReading,
        inputs: &DailyInputs,
    ) -> Result<ValuationResult> {
        validation::validate_price_series("MSTR", &inputs.mstr_prices)?;
        if inputs.mstr_history().is_empty() {
            return Err(CoreError::invalid(format!(
                "MSTR: no prices on or before {}",
                inputs.date
            )));
        }
        let reference = reading
            .price
            .ok_or_else(|| CoreError::invalid("MSTR: BTC reference price unavailable"))?;
        let actual = inputs
            .mstr_price()
            .ok_or_else(|| CoreError::invalid("MSTR: no price data"))?;
        valuation::evaluate(reference, actual)
    }

    /// Percent change of the last close over the trend lookback window.
    pub fn recent_trend_pct(&self, prices: &[PricePoint]) -> Option<f64> {
        let lookback = self.config.periods.trend_lookback;
        if lookback == 0 || prices.len() <= lookback {
            return None;
        }
        let last = prices.last()?.close;
        let base = prices[prices.len() - 1 - lookback].close;
        (base > 0.0).then(|| (last - base) / base * 100.0)
    }

    fn classify_strategy(
        &self,
        valuation: &ValuationResult,
        inputs: &DailyInputs,
    ) -> Option<Result<StrategyRecommendation>> {
        let iv_rank = inputs.mstr_iv_rank?;
        let (bias, strength) = bias_from_band(valuation.band);
        Some(self.classifier.classify(
            iv_rank,
            bias,
            strength,
            self.recent_trend_pct(inputs.mstr_history()),
        ))
    }

    /// Run one daily cycle against `store`.
    ///
    /// Per-asset input problems are recorded on the evaluation. State
    /// corruption and out-of-order dates abort the whole run before any
    /// signal state is written.
    pub fn evaluate_daily<S: StateStore + ?Sized>(
        &self,
        inputs: &DailyInputs,
        store: &mut S,
    ) -> Result<DailyEvaluation> {
        let date = inputs.date;
        let mut errors = Vec::new();
        let mut alerts = Vec::new();

        let reading = match self.compute_indicators(inputs) {
            Ok((reading, notes)) => {
                for note in notes {
                    warn!(asset = "BTC", date = %date, "Indicator skipped: {}", note);
                    errors.push(format!("BTC: {}", note));
                }
                reading
            }
            Err(e) => {
                warn!(asset = "BTC", date = %date, error = %e, "BTC evaluation aborted");
                alerts.push(alerts::data_error("BTC", &e.to_string()));
                errors.push(format!("BTC: {}", e));
                IndicatorReading::default()
            }
        };

        // Every signal is applied before any is saved, so a corrupt or
        // out-of-order state leaves the store as it was.
        let mut pending = Vec::with_capacity(SignalName::ALL.len());
        for name in SignalName::ALL {
            let condition = self.conditions.evaluate(name, &reading);
            let (state, update) = self.machine.prepare(&*store, name, condition, date)?;
            pending.push((name, condition, state, update));
        }

        let mut signals = Vec::with_capacity(pending.len());
        for (name, condition, state, update) in pending {
            self.machine.commit(store, name, &state, update, date)?;
            signals.push(SignalReport {
                status: SignalStatus::derive(&state, condition),
                days_active: state.days_active(date),
                stale: update.transition == Transition::Stale,
                transition: update.transition,
                condition,
                state,
            });
        }

        let valuation = match self.evaluate_valuation(&reading, inputs) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(asset = "MSTR", date = %date, error = %e, "MSTR valuation skipped");
                alerts.push(alerts::data_error("MSTR", &e.to_string()));
                errors.push(format!("MSTR: {}", e));
                None
            }
        };

        let strategy = match valuation
            .as_ref()
            .and_then(|v| self.classify_strategy(v, inputs))
        {
            Some(Ok(rec)) => Some(rec),
            Some(Err(e)) => {
                warn!(asset = "MSTR", date = %date, error = %e, "Strategy classification failed");
                errors.push(format!("MSTR: {}", e));
                None
            }
            None => None,
        };

        let data_quality = DataQuality {
            btc_issues: validation::btc_issues(&reading),
            mstr_issues: validation::mstr_issues(valuation.as_ref(), inputs.mstr_iv_rank),
        };

        alerts.extend(alerts::btc_alerts(&reading, &self.config.thresholds));
        if let Some(v) = &valuation {
            alerts.extend(alerts::mstr_alerts(v));
        }
        alerts.extend(alerts::transition_alerts(&signals));

        info!(
            date = %date,
            regime = ?reading.market_regime(),
            price_vs_ema_pct = ?reading.price_vs_ema_pct(),
            active_signals = signals.iter().filter(|s| s.state.active).count(),
            alerts = alerts.len(),
            errors = errors.len(),
            complete = data_quality.is_complete(),
            "Daily evaluation completed"
        );

        Ok(DailyEvaluation {
            date,
            indicators: reading,
            valuation,
            signals,
            strategy,
            alerts,
            data_quality,
            errors,
        })
    }
}
