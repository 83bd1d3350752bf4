//! Execution strategy selection
//!
//! This module decides **how many threads** a run uses and dispatches to the
//! right detection path. It knows nothing about the barrier protocol itself.
//!
//! ## What This Module Does:
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies configuration (thread percentage, max threads)
//! - **Dispatch**: Sequential trial division for one thread, barrier protocol for more
//! - **Audit**: Optional rayon-backed cross-check of a finished run
//!
//! # Example Usage
//!
//! ```rust
//! use detect_primes::parallel::ExecutionStrategy;
//!
//! // Explicit thread counts map directly onto a strategy
//! let strategy = ExecutionStrategy::from_thread_count(4).unwrap();
//! assert_eq!(strategy, ExecutionStrategy::Parallel { workers: 4 });
//!
//! // 0 requests auto-detection
//! let strategy = ExecutionStrategy::resolve(0, 0, 75).unwrap();
//! assert!(strategy.workers() >= 1);
//!
//! let detection = strategy.execute(&[2, 3, 4, 17]).unwrap();
//! assert_eq!(detection.primes, vec![2, 3, 17]);
//! ```

pub mod core;

pub use self::core::{ExecutionStrategy, verify};
