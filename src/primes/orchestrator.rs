//! Per-thread round loop
//!
//! Every worker runs the same state machine against one shared
//! [`RoundState`]. Four rendezvous per round keep the cohort in step:
//!
//! ```text
//!   Picking ──wait──▶ AwaitingPublish ──wait──┬──▶ Terminated   (finished)
//!      ▲      leader picks                    │
//!      │                                      ▼
//!      └──wait──wait── AwaitingCollect ◀── Working
//!         leader collects                scan own sub-range
//! ```
//!
//! There is no cancellation: a run ends only when the pick leader publishes
//! `finished` and every worker observes it after the publish rendezvous. The
//! one exception is a cohort that never fully started; its barrier is
//! aborted and the workers that did start go straight to `Terminated`.

use anyhow::Result;
use tracing::{debug, trace};

use super::barrier::{PhaseBarrier, Role};
use super::round::RoundState;
use super::tester::{self, ScanOutcome};

/// Where a worker is within the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Picking,
    AwaitingPublish,
    Working,
    AwaitingCollect,
    Terminated,
}

/// Primes found by one barrier-protocol run plus bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRun {
    pub primes: Vec<i64>,
    /// Pick phases executed, always `nums.len() + 1`
    pub rounds: usize,
}

/// Advance worker `ordinal` by one phase
pub fn step(
    phase: Phase,
    ordinal: usize,
    barrier: &PhaseBarrier,
    state: &RoundState<'_>,
) -> Phase {
    match phase {
        Phase::Picking => match barrier.wait() {
            Role::Aborted => Phase::Terminated,
            Role::Leader => {
                state.pick();
                Phase::AwaitingPublish
            }
            Role::Follower => Phase::AwaitingPublish,
        },
        Phase::AwaitingPublish => {
            if barrier.wait() == Role::Aborted || state.is_finished() {
                Phase::Terminated
            } else {
                Phase::Working
            }
        }
        Phase::Working => {
            if let Some(range) = state.sub_range(ordinal) {
                let outcome = tester::scan_range(state.candidate(), range, state.verdict());
                if let ScanOutcome::FoundDivisor { divisor } = outcome {
                    trace!(
                        worker = ordinal,
                        candidate = state.candidate(),
                        divisor,
                        "found divisor"
                    );
                }
            }
            Phase::AwaitingCollect
        }
        Phase::AwaitingCollect => {
            match barrier.wait() {
                Role::Aborted => return Phase::Terminated,
                Role::Leader => state.collect(),
                Role::Follower => {}
            }
            match barrier.wait() {
                Role::Aborted => Phase::Terminated,
                _ => Phase::Picking,
            }
        }
        Phase::Terminated => Phase::Terminated,
    }
}

/// Drive one worker until it observes `finished`
pub fn run_worker(ordinal: usize, barrier: &PhaseBarrier, state: &RoundState<'_>) {
    let mut phase = Phase::Picking;
    while phase != Phase::Terminated {
        phase = step(phase, ordinal, barrier, state);
    }
    trace!(worker = ordinal, "worker terminated");
}

/// Classify `nums` with `workers` threads rendezvousing on one barrier.
///
/// # Errors
/// Fails if `workers` is zero, the OS refuses to start a worker thread, or a
/// worker thread panics.
pub fn run_protocol(nums: &[i64], workers: usize) -> Result<ProtocolRun> {
    let barrier = PhaseBarrier::new(workers)?;
    let state = RoundState::new(nums, workers);

    crossbeam::thread::scope(|s| -> Result<()> {
        for ordinal in 0..workers {
            let barrier = &barrier;
            let state = &state;
            let spawned = s
                .builder()
                .name(format!("detect-worker-{ordinal}"))
                .spawn(move |_| run_worker(ordinal, barrier, state));

            if let Err(err) = spawned {
                // Workers already parked on the barrier would wait forever
                barrier.abort();
                let context = format!("Failed to start worker {ordinal} of {workers}");
                return Err(anyhow::Error::new(err).context(context));
            }
        }
        Ok(())
    })
    .map_err(|_| anyhow::anyhow!("Thread panic occurred during prime detection"))??;

    let rounds = state.rounds();
    let primes = state.into_results();
    debug!(workers, rounds, primes = primes.len(), "barrier protocol finished");

    Ok(ProtocolRun { primes, rounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::sequential::filter_primes;

    #[test]
    fn test_single_worker_state_machine_walk() {
        let nums = [5];
        let barrier = PhaseBarrier::new(1).unwrap();
        let state = RoundState::new(&nums, 1);

        let mut phase = Phase::Picking;
        let mut trace = vec![phase];
        while phase != Phase::Terminated {
            phase = step(phase, 0, &barrier, &state);
            trace.push(phase);
        }

        assert_eq!(
            trace,
            vec![
                Phase::Picking,
                Phase::AwaitingPublish,
                Phase::Working,
                Phase::AwaitingCollect,
                Phase::Picking,
                Phase::AwaitingPublish,
                Phase::Terminated,
            ]
        );
        assert_eq!(state.into_results(), vec![5]);
    }

    #[test]
    fn test_protocol_scenario() {
        let run = run_protocol(&[2, 3, 4, 17, 18, 97], 4).unwrap();
        assert_eq!(run.primes, vec![2, 3, 17, 97]);
        assert_eq!(run.rounds, 7);
    }

    #[test]
    fn test_protocol_empty_input_finishes_in_one_round() {
        for workers in [1, 2, 4, 8] {
            let run = run_protocol(&[], workers).unwrap();
            assert!(run.primes.is_empty());
            assert_eq!(run.rounds, 1);
        }
    }

    #[test]
    fn test_protocol_large_candidates() {
        let nums = [
            1_000_003,
            1_000_003 * 999_983,
            2_147_483_647,
            999_983 * 999_983,
            4_294_967_291,
            4_294_967_297, // 641 * 6700417
        ];
        for workers in [2, 3, 8] {
            let run = run_protocol(&nums, workers).unwrap();
            assert_eq!(run.primes, filter_primes(&nums), "workers = {workers}");
            assert_eq!(run.rounds, nums.len() + 1);
        }
    }

    #[test]
    fn test_aborted_cohort_terminates() {
        // Three parties expected, only two workers ever run
        let nums = [7, 11, 13];
        let barrier = PhaseBarrier::new(3).unwrap();
        let state = RoundState::new(&nums, 3);

        crossbeam::thread::scope(|s| {
            for ordinal in 0..2 {
                let (barrier, state) = (&barrier, &state);
                s.spawn(move |_| run_worker(ordinal, barrier, state));
            }
            barrier.abort();
        })
        .unwrap();

        assert_eq!(state.rounds(), 0);
        assert!(state.into_results().is_empty());
    }

    #[test]
    fn test_step_after_abort_terminates() {
        let nums = [7];
        let barrier = PhaseBarrier::new(2).unwrap();
        let state = RoundState::new(&nums, 2);
        barrier.abort();

        for phase in [Phase::Picking, Phase::AwaitingPublish, Phase::AwaitingCollect] {
            assert_eq!(step(phase, 0, &barrier, &state), Phase::Terminated);
        }
    }

    #[test]
    fn test_protocol_rejects_zero_workers() {
        assert!(run_protocol(&[7], 0).is_err());
    }
}
