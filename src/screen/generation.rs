//! Generation tokens for in-flight operations.
//!
//! Each issued operation gets a fresh, strictly increasing [`Generation`].
//! Only the latest issued generation may resolve; anything older is stale and
//! its outcome is dropped, which gives "last issued wins" regardless of the
//! order in which responses come back.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the single outstanding operation of one kind.
#[derive(Debug, Default)]
pub struct Tracker {
    issued: u64,
    outstanding: Option<Generation>,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::default()
    }

    /// Issue a new generation, returning it and the one it supersedes.
    pub fn issue(&mut self) -> (Generation, Option<Generation>) {
        self.issued += 1;
        let generation = Generation(self.issued);
        let superseded = self.outstanding.replace(generation);
        (generation, superseded)
    }

    /// Resolve `generation`. Returns `false` when it is stale.
    pub fn resolve(&mut self, generation: Generation) -> bool {
        if self.outstanding == Some(generation) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding generation without resolving it.
    pub fn cancel(&mut self) -> Option<Generation> {
        self.outstanding.take()
    }

    pub fn is_pending(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn outstanding(&self) -> Option<Generation> {
        self.outstanding
    }

    /// Number of generations issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
