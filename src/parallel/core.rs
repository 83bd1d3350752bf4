use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::primes::{Detection, PrimeDetector, sequential};

/// Execution strategy for a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Plain trial division on the calling thread
    Sequential,
    /// Barrier protocol with exactly `workers` threads
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Strategy for an explicit thread count.
    ///
    /// # Errors
    /// A thread count of zero has no meaning and is rejected.
    pub fn from_thread_count(threads: usize) -> Result<Self> {
        match threads {
            0 => anyhow::bail!("thread count must be at least 1"),
            1 => Ok(ExecutionStrategy::Sequential),
            workers => Ok(ExecutionStrategy::Parallel { workers }),
        }
    }

    /// Strategy from configuration.
    ///
    /// `requested` of 0 means auto-detect from the machine via
    /// [`calculate_optimal_workers`](Self::calculate_optimal_workers);
    /// anything else is used as-is.
    pub fn resolve(
        requested: usize,
        max_threads_config: usize,
        thread_percentage: u8,
    ) -> Result<Self> {
        let threads = if requested == 0 {
            let detected = Self::calculate_optimal_workers(max_threads_config, thread_percentage);
            debug!(detected, "auto-detected thread count");
            detected
        } else {
            requested
        };

        Self::from_thread_count(threads)
    }

    /// Number of threads this strategy runs on
    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Sequential => "sequential",
            ExecutionStrategy::Parallel { .. } => "parallel",
        }
    }

    /// Run detection over `nums`
    pub fn execute(&self, nums: &[i64]) -> Result<Detection> {
        PrimeDetector::new(self.workers())?.run(nums)
    }

    /// Calculate optimal workers from available cores and configuration limits
    ///
    /// # Algorithm
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    ///
    /// # Examples
    /// ```rust
    /// use detect_primes::parallel::ExecutionStrategy;
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
    /// assert!(workers >= 1);
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(8, 75);
    /// assert!(workers <= 8);
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        // 0 means no configured limit
        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}

/// Audit a detection result against trial division run with rayon.
///
/// This is candidate-parallel and independent of the barrier protocol, so it
/// catches any disagreement between the two paths.
///
/// # Errors
/// Returns an error describing the first mismatch.
pub fn verify(nums: &[i64], primes: &[i64]) -> Result<()> {
    let expected: Vec<i64> = nums
        .par_iter()
        .copied()
        .filter(|&n| sequential::is_prime(n))
        .collect();

    if expected == primes {
        debug!(primes = primes.len(), "verification passed");
        return Ok(());
    }

    let missing: Vec<i64> = expected.iter().copied().filter(|n| !primes.contains(n)).collect();
    let unexpected: Vec<i64> = primes.iter().copied().filter(|n| !expected.contains(n)).collect();
    warn!(?missing, ?unexpected, "verification failed");

    if missing.is_empty() && unexpected.is_empty() {
        anyhow::bail!("verification failed: primes are out of input order");
    }
    anyhow::bail!(
        "verification failed: {} prime(s) missing, {} unexpected",
        missing.len(),
        unexpected.len()
    )
}
