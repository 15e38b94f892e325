//! Signal evaluation: raw conditions, the per-signal state machine and the
//! daily engine that ties them to the indicator library.

pub mod alerts;
pub mod conditions;
pub mod engine;
pub mod state_machine;
pub mod store;
pub mod validation;

pub use conditions::ConditionEvaluator;
pub use engine::SignalEngine;
pub use state_machine::{SignalStateMachine, SignalUpdate};
pub use store::{InMemoryStateStore, StateStore};
