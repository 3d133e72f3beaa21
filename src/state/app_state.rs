// ============================================================================
// APP STATE - Application state passed down to every viewmodel
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::{CartState, SessionState};

/// What changed, so a subscriber can refresh only the affected part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateType {
    Session,
    Cart,
    Catalog,
    Vendor,
    Users,
}

type Subscriber = Rc<dyn Fn(UpdateType)>;

#[derive(Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub cart: CartState,
    change_subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn(UpdateType) + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub(crate) fn notify_subscribers(&self, update_type: UpdateType) {
        // Snapshot so a callback may subscribe without a borrow conflict
        let subscribers: Vec<Subscriber> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback(update_type);
        }
    }
}
