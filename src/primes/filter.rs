//! Trivial filter and divisor-range partitioning
//!
//! The filter settles most candidates without touching the worker pool:
//! anything below 2, the primes 2 and 3, multiples of 2 or 3, perfect squares
//! and candidates divisible by the top of their own scan range. Survivors get
//! their `[5, isqrt(n)]` divisor range split into per-worker chunks whose
//! widths are multiples of 6 so every worker stays on the `6k ± 1` wheel.

use super::round::{SubRange, Verdict};

/// Wheel stride for `6k ± 1` probes
pub const WHEEL: i64 = 6;

/// Result of screening a candidate before the parallel phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// The filter settled the candidate on its own
    Resolved(Verdict),
    /// Still possibly prime; divisors up to `upper` must be scanned
    NeedsScan { upper: i64 },
}

/// Screen `n` with the cheap checks.
///
/// The checks form a strict chain, so 2 and 3 stay prime even though they
/// are divisible by 2 and 3.
pub fn screen(n: i64) -> Screening {
    if n < 2 {
        return Screening::Resolved(Verdict::Composite);
    }
    if n <= 3 {
        return Screening::Resolved(Verdict::Prime);
    }
    if n % 2 == 0 || n % 3 == 0 {
        return Screening::Resolved(Verdict::Composite);
    }

    let upper = n.isqrt();
    if upper * upper == n || n % upper == 0 || n % (upper + 2) == 0 {
        return Screening::Resolved(Verdict::Composite);
    }

    Screening::NeedsScan { upper }
}

/// Per-worker chunk width for scanning `[lower, upper]` with `workers` threads.
///
/// The even share is rounded down to a multiple of 6 and shortened by one
/// more stride. Returns `None` when the result is 6 or less, in which case
/// the range is too narrow to be worth splitting.
pub fn chunk_size(lower: i64, upper: i64, workers: usize) -> Option<i64> {
    let workers = i64::try_from(workers.max(1)).ok()?;
    let span = upper - lower;
    if span <= 0 {
        return None;
    }

    let share = span / workers + i64::from(span % workers != 0);
    let chunk = share - share % WHEEL - WHEEL;
    (chunk > WHEEL).then_some(chunk)
}

/// Probe bounds for worker `ordinal` out of `workers`.
///
/// Every start is `lower + chunk * ordinal`, so with `lower = 5` all starts
/// sit on `6k + 5`. Workers other than the last stop one stride short of the
/// next worker's start; the last worker runs to `upper` and absorbs whatever
/// the rounding left over. Returns `None` when the start lies past `upper`.
pub fn sub_range(
    lower: i64,
    upper: i64,
    chunk: i64,
    ordinal: usize,
    workers: usize,
) -> Option<SubRange> {
    let offset = i64::try_from(ordinal).ok()?.checked_mul(chunk)?;
    let start = lower.checked_add(offset)?;
    if start > upper {
        return None;
    }

    let end = if ordinal + 1 >= workers {
        upper
    } else {
        (start + chunk - WHEEL).min(upper)
    };

    Some(SubRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::sequential::is_prime;

    #[test]
    fn test_screen_trivial_chain() {
        assert_eq!(screen(-5), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(0), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(1), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(2), Screening::Resolved(Verdict::Prime));
        assert_eq!(screen(3), Screening::Resolved(Verdict::Prime));
        assert_eq!(screen(4), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(9), Screening::Resolved(Verdict::Composite));
    }

    #[test]
    fn test_screen_squares_and_range_top() {
        assert_eq!(screen(25), Screening::Resolved(Verdict::Composite));
        // isqrt(35) = 5 divides it
        assert_eq!(screen(35), Screening::Resolved(Verdict::Composite));
        // 143 = 11 * 13 with isqrt(143) = 11
        assert_eq!(screen(143), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(9_999_997_800_000_121), Screening::Resolved(Verdict::Composite));
        assert_eq!(screen(97), Screening::NeedsScan { upper: 9 });
    }

    #[test]
    fn test_screen_never_contradicts_trial_division() {
        for n in -20..5000 {
            if let Screening::Resolved(verdict) = screen(n) {
                assert_eq!(verdict, Verdict::from_bool(is_prime(n)), "n = {n}");
            }
        }
    }

    #[test]
    fn test_chunk_size_rounding() {
        // ceil(995 / 4) = 249 -> 240
        assert_eq!(chunk_size(5, 1000, 4), Some(240));
        // ceil(94 / 8) = 12 -> 6, too small
        assert_eq!(chunk_size(5, 99, 8), None);
        // ceil(20 / 1) = 20 -> 12
        assert_eq!(chunk_size(5, 25, 1), Some(12));
        assert_eq!(chunk_size(5, 5, 4), None);
        assert_eq!(chunk_size(5, 2, 4), None);
    }

    #[test]
    fn test_chunk_size_is_wheel_aligned() {
        for upper in 5..5000 {
            for workers in 1..10 {
                if let Some(chunk) = chunk_size(5, upper, workers) {
                    assert_eq!(chunk % WHEEL, 0);
                    assert!(chunk > WHEEL);
                    assert!(chunk * workers as i64 <= upper - 5);
                }
            }
        }
    }

    #[test]
    fn test_sub_ranges_cover_every_probe() {
        for upper in 20..3000 {
            for workers in 2..9 {
                let Some(chunk) = chunk_size(5, upper, workers) else {
                    continue;
                };

                let mut probes = Vec::new();
                for ordinal in 0..workers {
                    if let Some(range) = sub_range(5, upper, chunk, ordinal, workers) {
                        assert_eq!((range.start - 5) % WHEEL, 0);
                        probes.extend((range.start..=range.end).step_by(WHEEL as usize));
                    }
                }

                let expected: Vec<i64> = (5..=upper).step_by(WHEEL as usize).collect();
                assert_eq!(probes, expected, "upper = {upper}, workers = {workers}");
            }
        }
    }

    #[test]
    fn test_sub_range_past_upper_is_empty() {
        assert_eq!(sub_range(5, 100, 48, 3, 4), None);
    }
}
