//! Single-threaded trial division
//!
//! This is both the `threads == 1` path and the fallback the pick leader uses
//! when a candidate's divisor range is too narrow to split across workers.

/// Returns true if `n` is prime.
///
/// Trial division by 2 and 3, then by `6k ± 1` up to `isqrt(n)`.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let max = n.isqrt();
    let mut i = 5;
    while i <= max {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Keep the primes of `nums` in input order
pub fn filter_primes(nums: &[i64]) -> Vec<i64> {
    nums.iter().copied().filter(|&n| is_prime(n)).collect()
}
