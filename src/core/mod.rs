//! Service primitives: HTTP surface and the daily scheduler

pub mod http;
pub mod scheduler;

pub use scheduler::DailyScheduler;
