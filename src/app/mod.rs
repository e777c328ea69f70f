//! Application module
//!
//! Command-line front end: argument parsing, configuration, wiring of the
//! backends into the pool, and rendering of finished Records.

pub mod cli;
pub mod delivery;
pub mod render;
pub mod startup;

#[cfg(test)]
mod tests;
