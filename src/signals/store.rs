//! State store seam for persisted signal state.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::signal::{SignalName, SignalState};

/// Load/save access to persisted [`SignalState`]. Missing state loads as a
/// fresh inactive signal.
pub trait StateStore {
    fn load_state(&self, name: SignalName) -> Result<SignalState>;
    fn save_state(&mut self, name: SignalName, state: SignalState) -> Result<()>;
}

/// In-memory store. The service layer hydrates one of these from the database
/// before a run and writes its contents back afterwards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: BTreeMap<SignalName, SignalState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_states(states: impl IntoIterator<Item = SignalState>) -> Self {
        Self {
            states: states.into_iter().map(|s| (s.name, s)).collect(),
        }
    }

    pub fn states(&self) -> Vec<SignalState> {
        self.states.values().cloned().collect()
    }

    pub fn get(&self, name: SignalName) -> Option<&SignalState> {
        self.states.get(&name)
    }
}

impl StateStore for InMemoryStateStore {
    fn load_state(&self, name: SignalName) -> Result<SignalState> {
        Ok(self
            .states
            .get(&name)
            .cloned()
            .unwrap_or_else(|| SignalState::inactive(name)))
    }

    fn save_state(&mut self, name: SignalName, state: SignalState) -> Result<()> {
        self.states.insert(name, state);
        Ok(())
    }
}
