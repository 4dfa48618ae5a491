// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-flight gate for token refresh.
//!
//! The first request to see an expired credential becomes the leader and
//! performs the refresh. Requests that fail while it is outstanding park on
//! the pending queue and are released, in queue order, with the leader's
//! outcome.

use crate::error::RefreshFailure;
use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;

/// New access token, or why the refresh failed.
pub type RefreshOutcome = Result<String, RefreshFailure>;

#[derive(Default)]
struct GateState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// In-flight flag plus pending queue, owned by one `ApiClient`.
#[derive(Default)]
pub struct RefreshGate {
    // Never held across an await.
    state: Mutex<GateState>,
}

/// What a request that hit a 401 should do.
pub enum Role<'a> {
    /// No refresh was running; this request must perform it.
    Leader(LeaderGuard<'a>),
    /// A refresh is running; await its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set the in-flight flag.
    pub fn enter(&self) -> Role<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            tracing::debug!(queued = state.waiters.len(), "Refresh in flight, request queued");
            Role::Follower(rx)
        } else {
            state.in_flight = true;
            Role::Leader(LeaderGuard {
                gate: self,
                settled: false,
            })
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear the flag and release every queued request exactly once.
    fn release(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter that timed out has dropped its receiver.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Held by the request performing the refresh.
///
/// Dropping it without calling [`LeaderGuard::settle`] (e.g. the leader's
/// future was cancelled) releases the queue with `RefreshFailure::Abandoned`.
pub struct LeaderGuard<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl LeaderGuard<'_> {
    pub fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.gate.release(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Token refresh abandoned, releasing queued requests");
            self.gate.release(&Err(RefreshFailure::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_leader_releases_every_waiter() {
        let gate = RefreshGate::new();

        let leader = match gate.enter() {
            Role::Leader(guard) => guard,
            Role::Follower(_) => panic!("first entrant must lead"),
        };
        assert!(gate.is_in_flight());

        let mut followers = Vec::new();
        for _ in 0..3 {
            match gate.enter() {
                Role::Follower(rx) => followers.push(rx),
                Role::Leader(_) => panic!("only one leader while in flight"),
            }
        }
        assert_eq!(gate.queued(), 3);

        leader.settle(&Ok("A2".to_string()));
        assert!(!gate.is_in_flight());
        assert_eq!(gate.queued(), 0);

        for rx in followers {
            assert_eq!(rx.await.unwrap(), Ok("A2".to_string()));
        }

        // Gate is reusable once settled.
        assert!(matches!(gate.enter(), Role::Leader(_)));
    }

    #[tokio::test]
    async fn test_failure_fans_out() {
        let gate = RefreshGate::new();
        let Role::Leader(leader) = gate.enter() else {
            panic!("expected leader");
        };
        let Role::Follower(rx) = gate.enter() else {
            panic!("expected follower");
        };

        leader.settle(&Err(RefreshFailure::Rejected(401)));
        assert_eq!(rx.await.unwrap(), Err(RefreshFailure::Rejected(401)));
    }

    #[tokio::test]
    async fn test_dropped_leader_releases_queue() {
        let gate = RefreshGate::new();
        let Role::Leader(leader) = gate.enter() else {
            panic!("expected leader");
        };
        let Role::Follower(rx) = gate.enter() else {
            panic!("expected follower");
        };

        drop(leader);
        assert!(!gate.is_in_flight());
        assert_eq!(rx.await.unwrap(), Err(RefreshFailure::Abandoned));

        // A released waiter re-entering takes over the refresh.
        assert!(matches!(gate.enter(), Role::Leader(_)));
    }

    #[tokio::test]
    async fn test_timed_out_waiter_does_not_block_release() {
        let gate = RefreshGate::new();
        let Role::Leader(leader) = gate.enter() else {
            panic!("expected leader");
        };
        let Role::Follower(rx) = gate.enter() else {
            panic!("expected follower");
        };
        drop(rx);

        leader.settle(&Ok("A2".to_string()));
        assert!(!gate.is_in_flight());
    }
}
