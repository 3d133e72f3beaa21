// ============================================================================
// REQUEST TRACKER - Last-response-wins ordering per resource key
// ============================================================================
// A response is applied only if nothing newer for the same key has been
// applied already. Mutations call `supersede` when acknowledged so that
// reads started before them cannot overwrite the mutated state.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Clone, Default)]
pub struct RequestTracker {
    next_seq: Rc<Cell<u64>>,
    applied: Rc<RefCell<HashMap<String, u64>>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);
        seq
    }

    /// Register a request about to be sent.
    pub fn begin(&self, key: &str) -> Ticket {
        Ticket {
            key: key.to_string(),
            seq: self.bump(),
        }
    }

    /// Claim the right to apply a response. Returns false if a newer
    /// response (or mutation) for the key was applied first.
    pub fn accept(&self, ticket: &Ticket) -> bool {
        let mut applied = self.applied.borrow_mut();
        let watermark = applied.entry(ticket.key.clone()).or_insert(0);
        if ticket.seq > *watermark {
            *watermark = ticket.seq;
            true
        } else {
            log::debug!("⏭️ Discarding stale response for '{}'", ticket.key);
            false
        }
    }

    /// Invalidate every request for `key` begun so far.
    pub fn supersede(&self, key: &str) {
        let seq = self.bump();
        self.applied.borrow_mut().insert(key.to_string(), seq);
    }

    /// Whether a later `accept` for this ticket could still succeed.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.applied
            .borrow()
            .get(&ticket.key)
            .map_or(true, |watermark| ticket.seq > *watermark)
    }
}
