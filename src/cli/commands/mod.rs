//! Command implementations for the detect-primes CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod detect;
pub mod version;
