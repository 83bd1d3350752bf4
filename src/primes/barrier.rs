//! Reusable sense-reversing barrier with leader election
//!
//! Every rendezvous releases all `n` participants together and hands exactly
//! one of them [`Role::Leader`]. The leader is whichever caller brings the
//! arrival count to zero; there is no fairness or thread-id scheme behind it.
//!
//! A cohort that can never complete (a worker failed to start) is released
//! with [`PhaseBarrier::abort`]; every pending and later `wait` then returns
//! [`Role::Aborted`].

use anyhow::Result;
use parking_lot::{Condvar, Mutex};

/// Outcome of a single [`PhaseBarrier::wait`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The one caller per rendezvous that performs the serial work
    Leader,
    /// Every other caller
    Follower,
    /// The barrier was aborted and no rendezvous took place
    Aborted,
}

impl Role {
    pub fn is_leader(self) -> bool {
        matches!(self, Role::Leader)
    }
}

#[derive(Debug)]
struct BarrierState {
    /// Arrivals still missing for the current rendezvous
    remaining: usize,
    /// Flipped once per completed rendezvous
    sense: bool,
    aborted: bool,
}

/// Rendezvous point for a fixed cohort of worker threads
#[derive(Debug)]
pub struct PhaseBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl PhaseBarrier {
    /// Create a barrier for `parties` participants.
    ///
    /// # Errors
    /// Returns an error if `parties` is zero.
    pub fn new(parties: usize) -> Result<Self> {
        if parties == 0 {
            anyhow::bail!("barrier needs at least one participant");
        }

        Ok(Self {
            parties,
            state: Mutex::new(BarrierState {
                remaining: parties,
                sense: false,
                aborted: false,
            }),
            released: Condvar::new(),
        })
    }

    /// Block until all participants have arrived at this rendezvous.
    ///
    /// Exactly one caller per rendezvous receives [`Role::Leader`]. The
    /// barrier is reusable as soon as the call returns; a waiter only wakes
    /// when the sense it arrived with has been flipped, so a release can
    /// never leak into the next rendezvous and spurious wakeups go back to
    /// sleep.
    pub fn wait(&self) -> Role {
        let mut state = self.state.lock();

        if state.aborted {
            return Role::Aborted;
        }

        if state.remaining == 1 {
            state.remaining = self.parties;
            state.sense = !state.sense;
            self.released.notify_all();
            return Role::Leader;
        }

        state.remaining -= 1;
        let arrived_with = state.sense;
        while state.sense == arrived_with && !state.aborted {
            self.released.wait(&mut state);
        }

        if state.sense == arrived_with {
            Role::Aborted
        } else {
            Role::Follower
        }
    }

    /// Release every current waiter and make all later waits return
    /// [`Role::Aborted`]
    pub fn abort(&self) {
        let mut state = self.state.lock();
        state.aborted = true;
        self.released.notify_all();
    }
}
