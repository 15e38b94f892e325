//! Database persistence layer.

pub mod postgres;

pub use postgres::{DbResult, PostgresDatabase};
