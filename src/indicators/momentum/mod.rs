//! Momentum indicators: weekly RSI

pub mod rsi;

pub use rsi::*;
