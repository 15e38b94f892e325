//! Indicator library: pure functions over ascending daily closes.

pub mod math;

pub mod cycle;
pub mod momentum;
pub mod trend;

pub use cycle::*;
pub use momentum::*;
pub use trend::*;
