//! Daily evaluation jobs

pub mod context;
pub mod handlers;

pub use context::JobContext;
pub use handlers::{run_daily_cycle, run_today, run_with_inputs};
