//! Explicit state machine for one optimistic mutation.
//!
//! Every authenticated cart/wishlist mutation runs the same shape: capture a
//! snapshot, apply the change locally, await the server, then either commit
//! (snapshot discarded) or roll back (snapshot restored). Modeling the shape
//! as a value makes the window between "applied locally" and "confirmed by
//! the server" visible and testable instead of implicit in call order.

/// Phase of an in-flight optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// Snapshot captured; the local change has not been applied yet.
    ApplyingOptimistic,
    /// Local state reflects the change; the server call is outstanding.
    AwaitingServer,
}

/// One optimistic mutation over a state value of type `T`.
///
/// The terminal states (committed, rolled back) consume the mutation:
/// [`Mutation::commit`] drops the snapshot, [`Mutation::roll_back`] returns
/// it so the caller can restore it. A consumed mutation cannot be reused,
/// so a single mutation can never both commit and roll back.
#[derive(Debug)]
pub struct Mutation<T: Clone> {
    snapshot: T,
    phase: MutationPhase,
}

impl<T: Clone> Mutation<T> {
    /// Captures `current` as the rollback snapshot.
    pub fn begin(current: &T) -> Self {
        Self {
            snapshot: current.clone(),
            phase: MutationPhase::ApplyingOptimistic,
        }
    }

    /// Marks the local change as applied; the mutation now awaits the
    /// server's verdict.
    pub fn applied(&mut self) {
        self.phase = MutationPhase::AwaitingServer;
    }

    #[must_use]
    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// The server confirmed the mutation; the optimistic state stands and
    /// the snapshot is discarded.
    pub fn commit(self) {}

    /// The server rejected the mutation; returns the snapshot for the
    /// caller to restore.
    #[must_use]
    pub fn roll_back(self) -> T {
        self.snapshot
    }
}
