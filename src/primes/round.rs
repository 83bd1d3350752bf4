//! Shared state for one detection run
//!
//! A single [`RoundState`] is created per run and overwritten every round.
//! Serial phases write it from the elected leader only; the barrier
//! rendezvous that follows publishes those writes to every worker. The
//! scalar fields live in relaxed atomics so the struct is `Sync` without any
//! `unsafe`; their ordering comes from the barrier, not from the atomics.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, AtomicUsize, Ordering};
use tracing::debug;

use super::filter::{self, Screening};
use super::sequential;

/// Lower end of every divisor scan; 2 and 3 are handled by the filter
pub const SCAN_LOWER_BOUND: i64 = 5;

/// Classification of the candidate under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Verdict {
    Unknown = 0,
    Prime = 1,
    Composite = 2,
}

impl Verdict {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Verdict::Prime,
            2 => Verdict::Composite,
            _ => Verdict::Unknown,
        }
    }

    pub fn from_bool(is_prime: bool) -> Self {
        if is_prime {
            Verdict::Prime
        } else {
            Verdict::Composite
        }
    }
}

/// Verdict cell shared by all workers.
///
/// During a work phase it can only move toward [`Verdict::Composite`]; the
/// leader resets or settles it during serial phases.
#[derive(Debug)]
pub struct SharedVerdict(AtomicU8);

impl SharedVerdict {
    pub fn new() -> Self {
        Self(AtomicU8::new(Verdict::Unknown as u8))
    }

    pub fn get(&self) -> Verdict {
        Verdict::from_raw(self.0.load(Ordering::Relaxed))
    }

    pub fn is_composite(&self) -> bool {
        self.get() == Verdict::Composite
    }

    /// Move the verdict to composite.
    ///
    /// Returns true if this call performed the transition, false if some
    /// other worker got there first. Never moves the verdict backwards.
    pub fn mark_composite(&self) -> bool {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            if current == Verdict::Composite as u8 {
                return false;
            }
            match self.0.compare_exchange_weak(
                current,
                Verdict::Composite as u8,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Overwrite the verdict. Serial phases only.
    pub fn settle(&self, verdict: Verdict) {
        self.0.store(verdict as u8, Ordering::Relaxed);
    }
}

impl Default for SharedVerdict {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive probe bounds for one worker's share of the divisor range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRange {
    pub start: i64,
    pub end: i64,
}

/// Round-scoped data shared by every worker of one run
#[derive(Debug)]
pub struct RoundState<'a> {
    nums: &'a [i64],
    workers: usize,
    cursor: AtomicUsize,
    candidate: AtomicI64,
    upper: AtomicI64,
    /// Per-worker probe width, 0 when nobody scans this round
    chunk: AtomicI64,
    finished: AtomicBool,
    rounds: AtomicUsize,
    verdict: SharedVerdict,
    results: Mutex<Vec<i64>>,
}

impl<'a> RoundState<'a> {
    pub fn new(nums: &'a [i64], workers: usize) -> Self {
        Self {
            nums,
            workers,
            cursor: AtomicUsize::new(0),
            candidate: AtomicI64::new(0),
            upper: AtomicI64::new(0),
            chunk: AtomicI64::new(0),
            finished: AtomicBool::new(false),
            rounds: AtomicUsize::new(0),
            verdict: SharedVerdict::new(),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Pick phase: take the next candidate, screen it and partition its
    /// divisor range. Leader only.
    pub fn pick(&self) {
        let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
        let cursor = self.cursor.load(Ordering::Relaxed);

        self.chunk.store(0, Ordering::Relaxed);

        let Some(&candidate) = self.nums.get(cursor) else {
            self.verdict.settle(Verdict::Unknown);
            self.finished.store(true, Ordering::Relaxed);
            debug!(round, "candidates exhausted");
            return;
        };

        self.candidate.store(candidate, Ordering::Relaxed);
        self.verdict.settle(Verdict::Prime);
        self.cursor.store(cursor + 1, Ordering::Relaxed);

        match filter::screen(candidate) {
            Screening::Resolved(verdict) => {
                self.verdict.settle(verdict);
                debug!(round, candidate, ?verdict, "resolved by trivial filter");
            }
            Screening::NeedsScan { upper } => {
                self.upper.store(upper, Ordering::Relaxed);
                match filter::chunk_size(SCAN_LOWER_BOUND, upper, self.workers) {
                    Some(chunk) => {
                        self.chunk.store(chunk, Ordering::Relaxed);
                        debug!(round, candidate, upper, chunk, "partitioned divisor range");
                    }
                    None => {
                        let verdict = Verdict::from_bool(sequential::is_prime(candidate));
                        self.verdict.settle(verdict);
                        debug!(
                            round,
                            candidate,
                            ?verdict,
                            "range too small, resolved sequentially"
                        );
                    }
                }
            }
        }
    }

    /// Sub-range for worker `ordinal` this round, `None` if it has nothing to scan
    pub fn sub_range(&self, ordinal: usize) -> Option<SubRange> {
        let chunk = self.chunk.load(Ordering::Relaxed);
        if chunk <= 0 {
            return None;
        }

        filter::sub_range(
            SCAN_LOWER_BOUND,
            self.upper.load(Ordering::Relaxed),
            chunk,
            ordinal,
            self.workers,
        )
    }

    /// Collect phase: keep the candidate if it survived. Leader only.
    pub fn collect(&self) {
        if self.verdict.get() == Verdict::Prime {
            let candidate = self.candidate();
            self.results.lock().push(candidate);
        }
    }

    pub fn candidate(&self) -> i64 {
        self.candidate.load(Ordering::Relaxed)
    }

    pub fn verdict(&self) -> &SharedVerdict {
        &self.verdict
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    /// Pick phases executed so far
    pub fn rounds(&self) -> usize {
        self.rounds.load(Ordering::Relaxed)
    }

    /// Consume the state, returning the collected primes in input order
    pub fn into_results(self) -> Vec<i64> {
        self.results.into_inner()
    }
}
