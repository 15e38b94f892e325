//! Options strategy selection for MSTR.

pub mod options;

pub use options::{select_strategy, ConflictRule, NoConflict, OptionsClassifier};
