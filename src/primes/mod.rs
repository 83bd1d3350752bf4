//! Phase-synchronized parallel prime detection
//!
//! Candidates are classified one at a time. For each candidate a single
//! leader thread screens it and splits its divisor range, then every worker
//! scans its own share, then a leader records the verdict. The phases are
//! separated by a reusable [`PhaseBarrier`] that also elects the leader.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ pick         │──▶│ publish      │──▶│ work         │──▶│ collect      │
//! │ (leader)     │   │ (all)        │   │ (all, racy   │   │ (leader)     │
//! │ filter +     │   │ exit if      │   │  verdict)    │   │ keep prime   │
//! │ partition    │   │ finished     │   │              │   │              │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use detect_primes::primes::detect_primes;
//!
//! let primes = detect_primes(&[2, 3, 4, 17, 18, 97], 4).unwrap();
//! assert_eq!(primes, vec![2, 3, 17, 97]);
//! ```

pub mod barrier;
pub mod filter;
pub mod orchestrator;
pub mod round;
pub mod sequential;
pub mod tester;

pub use barrier::{PhaseBarrier, Role};
pub use round::{RoundState, SharedVerdict, Verdict};
pub use sequential::is_prime;

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a detection run
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Primes in input order
    pub primes: Vec<i64>,
    /// Worker threads used, 1 for the sequential path
    pub workers: usize,
    /// Barrier rounds executed, 0 for the sequential path
    pub rounds: usize,
    pub elapsed: Duration,
}

/// Prime detector for a fixed thread count
#[derive(Debug, Clone, Copy)]
pub struct PrimeDetector {
    threads: usize,
}

impl PrimeDetector {
    /// # Errors
    /// A thread count of zero is rejected.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            anyhow::bail!("thread count must be at least 1");
        }
        Ok(Self { threads })
    }

    /// Classify `nums`.
    ///
    /// One thread runs plain trial division over the input; more threads
    /// run the barrier protocol with exactly that many workers.
    pub fn run(&self, nums: &[i64]) -> Result<Detection> {
        let start = Instant::now();

        let (primes, rounds) = if self.threads == 1 {
            (sequential::filter_primes(nums), 0)
        } else {
            let run = orchestrator::run_protocol(nums, self.threads)?;
            (run.primes, run.rounds)
        };

        let elapsed = start.elapsed();
        info!(
            candidates = nums.len(),
            primes = primes.len(),
            threads = self.threads,
            rounds,
            elapsed_ms = elapsed.as_millis() as u64,
            "detection complete"
        );

        Ok(Detection {
            primes,
            workers: self.threads,
            rounds,
            elapsed,
        })
    }
}

/// Return the primes of `nums` in input order, using `threads` threads
pub fn detect_primes(nums: &[i64], threads: usize) -> Result<Vec<i64>> {
    Ok(PrimeDetector::new(threads)?.run(nums)?.primes)
}
