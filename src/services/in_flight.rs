// ============================================================================
// IN-FLIGHT GUARD - One mutation per resource at a time
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::{AppError, AppResult};

#[derive(Clone, Default)]
pub struct InFlight {
    active: Rc<RefCell<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` busy until the returned guard is dropped. `label` names
    /// the operation in the error if the key is already busy.
    pub fn acquire(&self, key: &str, label: &str) -> AppResult<InFlightGuard> {
        if !self.active.borrow_mut().insert(key.to_string()) {
            log::warn!("⚠️ {} ignored: '{}' busy", label, key);
            return Err(AppError::InFlight(label.to_string()));
        }
        Ok(InFlightGuard {
            key: key.to_string(),
            active: self.active.clone(),
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.active.borrow().contains(key)
    }
}

pub struct InFlightGuard {
    key: String,
    active: Rc<RefCell<HashSet<String>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let in_flight = InFlight::new();
        let guard = in_flight.acquire("cart-1", "Checkout").unwrap();
        assert!(in_flight.is_busy("cart-1"));

        let err = in_flight.acquire("cart-1", "Checkout").err().unwrap();
        assert_eq!(err, AppError::InFlight("Checkout".into()));

        drop(guard);
        assert!(!in_flight.is_busy("cart-1"));
        assert!(in_flight.acquire("cart-1", "Checkout").is_ok());
    }

    #[test]
    fn test_other_keys_unaffected() {
        let in_flight = InFlight::new();
        let _a = in_flight.acquire("cart-1", "Remove").unwrap();
        assert!(in_flight.acquire("cart-2", "Remove").is_ok());
    }
}
