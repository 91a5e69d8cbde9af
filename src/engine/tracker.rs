// src/engine/tracker.rs

//! Bookkeeping for build invocations.
//!
//! The tracker never limits or orders builds. It only hands out ids and
//! remembers which builds have not reported back yet.

use std::collections::BTreeSet;

use super::BuildId;

#[derive(Debug, Default)]
pub struct BuildTracker {
    next_id: BuildId,
    in_flight: BTreeSet<BuildId>,
    started: u64,
    finished: u64,
}

impl BuildTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new build and mark it in flight.
    pub fn start(&mut self) -> BuildId {
        self.next_id += 1;
        self.started += 1;
        self.in_flight.insert(self.next_id);
        self.next_id
    }

    /// Mark a build as finished.
    ///
    /// Returns false if the id was not in flight (unknown or reported twice).
    pub fn finish(&mut self, id: BuildId) -> bool {
        let known = self.in_flight.remove(&id);
        if known {
            self.finished += 1;
        }
        known
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Total builds started since creation.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Total builds that reported back since creation.
    pub fn finished(&self) -> u64 {
        self.finished
    }
}
