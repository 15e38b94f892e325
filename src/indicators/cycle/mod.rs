//! Cycle indicators: Pi-Cycle Top

pub mod pi_cycle;

pub use pi_cycle::*;
