//! # detect-primes - barrier-synchronized parallel prime detection
//!
//! Classifies a sequence of integers as prime or composite. Candidates are
//! tested one at a time; what runs in parallel is the trial-division scan
//! of each candidate's divisor range, coordinated by a reusable
//! sense-reversing barrier that elects one leader per phase.
//!
//! ## Quick Start
//!
//! ```bash
//! # Detect primes in a file with 4 worker threads
//! detect-primes detect numbers.txt --threads 4
//!
//! # Read from stdin, emit JSON
//! echo "2 3 4 17 18 97" | detect-primes detect --format json
//! ```
//!
//! ```rust
//! let primes = detect_primes::detect_primes(&[2, 3, 4, 17, 18, 97], 4).unwrap();
//! assert_eq!(primes, vec![2, 3, 17, 97]);
//! ```

pub mod cli;
pub mod config;
pub mod input;
pub mod parallel;
pub mod primes;
pub mod report;

pub use cli::{Cli, Output};
pub use config::{DetectPrimesConfig, Settings};
pub use primes::{Detection, PrimeDetector, detect_primes, is_prime};

/// Result type alias for detect-primes operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
