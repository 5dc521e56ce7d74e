//! CLI command implementations.

mod display;

pub mod check;
pub mod symbols;
