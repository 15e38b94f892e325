//! Per-signal ACTIVE / INACTIVE state machine with grace-period hysteresis.
//!
//! A signal activates the first day its raw condition holds. Once active it
//! survives failing days until `today - last_condition_met_on` exceeds the
//! signal's grace window. Each date is applied at most once.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::GracePeriods;
use crate::error::{CoreError, Result};
use crate::models::signal::{RawCondition, SignalName, SignalState, Transition};
use crate::signals::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalUpdate {
    pub transition: Transition,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SignalStateMachine {
    grace: GracePeriods,
}

impl SignalStateMachine {
    pub fn new(grace: GracePeriods) -> Self {
        Self { grace }
    }

    pub fn grace_days(&self, name: SignalName) -> i64 {
        match name {
            SignalName::BtcBuy => self.grace.btc_buy,
            SignalName::BtcSell => self.grace.btc_sell,
            SignalName::PiCycleTop => self.grace.pi_cycle_top,
        }
    }

    /// Reject persisted state that breaks the state invariants.
    pub fn validate(state: &SignalState) -> Result<()> {
        let corrupt = |reason: &str| CoreError::StateCorruption {
            signal: state.name.to_string(),
            reason: reason.to_string(),
        };

        if state.active {
            let activated = state
                .activated_on
                .ok_or_else(|| corrupt("active without activated_on"))?;
            let last_met = state
                .last_condition_met_on
                .ok_or_else(|| corrupt("active without last_condition_met_on"))?;
            if activated > last_met {
                return Err(corrupt("activated_on is after last_condition_met_on"));
            }
        } else if state.activated_on.is_some() {
            return Err(corrupt("inactive with activated_on set"));
        }

        if let (Some(start), Some(end)) = (state.last_activated_on, state.deactivated_on) {
            if start > end {
                return Err(corrupt("last_activated_on is after deactivated_on"));
            }
        }

        if let (Some(met), Some(evaluated)) = (state.last_condition_met_on, state.last_evaluated_on)
        {
            if met > evaluated {
                return Err(corrupt("last_condition_met_on is after last_evaluated_on"));
            }
        }

        Ok(())
    }

    /// Apply today's raw condition to `state`, returning the next state.
    pub fn apply(
        &self,
        state: &SignalState,
        condition: RawCondition,
        today: NaiveDate,
    ) -> Result<(SignalState, Transition)> {
        Self::validate(state)?;

        if let Some(last) = state.last_evaluated_on {
            if today == last {
                return Ok((state.clone(), Transition::AlreadyEvaluated));
            }
            if today < last {
                return Err(CoreError::invalid(format!(
                    "{}: evaluation date {} precedes last evaluated date {}",
                    state.name, today, last
                )));
            }
        }
        if let Some(met) = state.last_condition_met_on {
            if today < met {
                return Err(CoreError::invalid(format!(
                    "{}: evaluation date {} precedes last condition date {}",
                    state.name, today, met
                )));
            }
        }

        if condition == RawCondition::Unknown {
            return Ok((state.clone(), Transition::Stale));
        }

        let mut next = state.clone();
        next.last_evaluated_on = Some(today);

        let transition = match (condition, state.active) {
            (RawCondition::Met, false) => {
                next.active = true;
                next.activated_on = Some(today);
                next.last_condition_met_on = Some(today);
                next.deactivated_on = None;
                next.last_activated_on = None;
                Transition::Activated
            }
            (RawCondition::Met, true) => {
                next.last_condition_met_on = Some(today);
                Transition::Sustained
            }
            (RawCondition::NotMet, true) => {
                // validate() guarantees an active state has a last-met date
                let last_met = state.last_condition_met_on.unwrap_or(today);
                let days = (today - last_met).num_days();
                if days > self.grace_days(state.name) {
                    next.active = false;
                    next.last_activated_on = state.activated_on;
                    next.activated_on = None;
                    next.deactivated_on = Some(today);
                    Transition::Deactivated {
                        days_since_condition_met: days,
                    }
                } else {
                    Transition::Held {
                        days_since_condition_met: days,
                    }
                }
            }
            (RawCondition::NotMet, false) => Transition::Unchanged,
            (RawCondition::Unknown, _) => Transition::Stale,
        };

        Ok((next, transition))
    }

    /// Load and apply one signal without writing anything back.
    pub fn prepare<S: StateStore + ?Sized>(
        &self,
        store: &S,
        name: SignalName,
        condition: RawCondition,
        today: NaiveDate,
    ) -> Result<(SignalState, SignalUpdate)> {
        let current = store.load_state(name)?;
        let (next, transition) = self.apply(&current, condition, today)?;
        let changed = next != current;
        Ok((next, SignalUpdate { transition, changed }))
    }

    /// Log a prepared update and persist it when the state changed.
    pub fn commit<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        name: SignalName,
        state: &SignalState,
        update: SignalUpdate,
        today: NaiveDate,
    ) -> Result<()> {
        match update.transition {
            Transition::Activated => {
                info!(signal = %name, date = %today, "Signal activated");
            }
            Transition::Deactivated {
                days_since_condition_met,
            } => {
                info!(
                    signal = %name,
                    date = %today,
                    days = days_since_condition_met,
                    "Signal deactivated after {} days without its condition",
                    days_since_condition_met
                );
            }
            Transition::Held {
                days_since_condition_met,
            } => {
                debug!(
                    signal = %name,
                    days = days_since_condition_met,
                    grace = self.grace_days(name),
                    "Signal weakening, held by grace period"
                );
            }
            Transition::Stale => {
                warn!(signal = %name, date = %today, "Raw condition unavailable, state left untouched");
            }
            Transition::AlreadyEvaluated => {
                debug!(signal = %name, date = %today, "Date already evaluated, skipping");
            }
            Transition::Sustained | Transition::Unchanged => {}
        }

        if update.changed {
            store.save_state(name, state.clone())?;
        }
        Ok(())
    }

    /// Load, apply and persist one signal through `store`.
    pub fn evaluate<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        name: SignalName,
        condition: RawCondition,
        today: NaiveDate,
    ) -> Result<(SignalState, SignalUpdate)> {
        let (next, update) = self.prepare(&*store, name, condition, today)?;
        self.commit(store, name, &next, update, today)?;
        Ok((next, update))
    }
}
