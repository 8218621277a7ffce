//! Call recording for the fake store.
//!
//! Every operation the store serves is appended here so tests can assert on
//! what the code under test asked for, not just on resulting state.

use std::cell::RefCell;

use fakegrid_core::api::{Call, CallKind};

/// Append-only log of [`Call`]s in invocation order.
///
/// Reads on the store take `&self`, so the log lives behind a `RefCell`.
/// This keeps the store `Send` but not `Sync`.
#[derive(Debug, Default, Clone)]
pub struct CallJournal {
    calls: RefCell<Vec<Call>>,
}

impl CallJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `call` to the log.
    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Returns a copy of every recorded call.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Returns a copy of the recorded calls of one kind.
    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.kind() == kind)
            .cloned()
            .collect()
    }

    /// Returns how many recorded calls are of one kind.
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.kind() == kind)
            .count()
    }

    /// Returns the most recent call, if any.
    pub fn last(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Returns `true` if no call has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
