//! Cyclewatch: daily Bitcoin / MSTR market-cycle monitor.
//!
//! The pure core (indicators, valuation, signal state machine, options
//! classifier) is synchronous and free of I/O. Everything around it
//! (providers, persistence, scheduling, HTTP) lives in the service modules.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod strategies;
pub mod valuation;

pub use error::{CoreError, Result};
