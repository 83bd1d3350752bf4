//! Per-worker divisor scan

use super::filter::WHEEL;
use super::round::{SharedVerdict, SubRange};

/// Outcome of one worker's scan, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every probe in the sub-range was tried without finding a divisor
    Exhausted { probes: u64 },
    /// This worker found a divisor and flipped the verdict
    FoundDivisor { divisor: i64 },
    /// Another worker flipped the verdict first
    Preempted { probes: u64 },
}

/// Scan `range` for a divisor of `candidate` on the `6k ± 1` wheel.
///
/// Probes `i` and `i + 2` for `i = start, start + 6, ..` up to `end`. The
/// shared verdict is checked before every probe so a worker stops soon after
/// any other worker has marked the candidate composite. That check is
/// best-effort: a worker may run a few probes past another worker's hit.
pub fn scan_range(candidate: i64, range: SubRange, verdict: &SharedVerdict) -> ScanOutcome {
    let mut probes = 0;
    let mut i = range.start;

    while i <= range.end {
        if verdict.is_composite() {
            return ScanOutcome::Preempted { probes };
        }

        let divisor = if candidate % i == 0 {
            Some(i)
        } else if candidate % (i + 2) == 0 {
            Some(i + 2)
        } else {
            None
        };

        if let Some(divisor) = divisor {
            verdict.mark_composite();
            return ScanOutcome::FoundDivisor { divisor };
        }

        probes += 1;
        i += WHEEL;
    }

    ScanOutcome::Exhausted { probes }
}
