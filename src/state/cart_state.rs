// ============================================================================
// CART STATE - Active cart, current page of items, phase
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::cart::{page_total, CartId, CartItem, CartPage};
use crate::models::PageCursor;

/// `Empty → Loading → Loaded → Mutating → Loaded`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CartPhase {
    #[default]
    Empty,
    Loading,
    Loaded,
    Mutating,
}

#[derive(Clone, Default)]
pub struct CartState {
    cart_id: Rc<RefCell<Option<CartId>>>,
    items: Rc<RefCell<Vec<CartItem>>>,
    total_items: Rc<RefCell<u32>>,
    cursor: Rc<RefCell<PageCursor>>,
    phase: Rc<RefCell<CartPhase>>,
    error: Rc<RefCell<Option<String>>>,
    has_loaded: Rc<RefCell<bool>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_cart_id(&self) -> Option<CartId> {
        self.cart_id.borrow().clone()
    }

    /// Switching carts forgets the items of the previous one.
    pub(crate) fn set_cart_id(&self, cart_id: Option<CartId>) {
        if *self.cart_id.borrow() != cart_id {
            self.reset_items();
        }
        *self.cart_id.borrow_mut() = cart_id;
    }

    pub fn is_active(&self, cart_id: &CartId) -> bool {
        self.cart_id.borrow().as_ref() == Some(cart_id)
    }

    pub fn get_items(&self) -> Vec<CartItem> {
        self.items.borrow().clone()
    }

    pub fn item(&self, animal_id: &str) -> Option<CartItem> {
        self.items
            .borrow()
            .iter()
            .find(|i| i.animal_id == animal_id)
            .cloned()
    }

    pub fn get_total_items(&self) -> u32 {
        *self.total_items.borrow()
    }

    pub fn get_cursor(&self) -> PageCursor {
        *self.cursor.borrow()
    }

    pub fn get_phase(&self) -> CartPhase {
        *self.phase.borrow()
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Sum of price × quantity over the loaded page only.
    pub fn total(&self) -> f64 {
        page_total(&self.items.borrow())
    }

    pub(crate) fn set_error(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
    }

    pub(crate) fn begin(&self, phase: CartPhase) {
        *self.phase.borrow_mut() = phase;
    }

    /// Phase after an operation finished, successful or not.
    pub(crate) fn settle(&self) {
        let phase = if *self.has_loaded.borrow() {
            CartPhase::Loaded
        } else {
            CartPhase::Empty
        };
        *self.phase.borrow_mut() = phase;
    }

    /// Make `cart_id` active with `page` as its loaded items.
    pub(crate) fn apply_page(&self, cart_id: &CartId, page: CartPage, requested: u32) {
        *self.cart_id.borrow_mut() = Some(cart_id.clone());
        *self.items.borrow_mut() = page.items;
        *self.total_items.borrow_mut() = page.total_items;
        *self.cursor.borrow_mut() = PageCursor::new(requested, page.total_pages);
        *self.has_loaded.borrow_mut() = true;
    }

    /// Replace the item with the same animal id in place, or append it.
    pub(crate) fn upsert_item(&self, item: CartItem) {
        let mut items = self.items.borrow_mut();
        match items.iter_mut().find(|i| i.animal_id == item.animal_id) {
            Some(existing) => *existing = item,
            None => {
                items.push(item);
                *self.total_items.borrow_mut() += 1;
            }
        }
        *self.has_loaded.borrow_mut() = true;
    }

    pub(crate) fn remove_item(&self, animal_id: &str) {
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|i| i.animal_id != animal_id);
        if items.len() < before {
            let mut total = self.total_items.borrow_mut();
            *total = total.saturating_sub(1);
        }
    }

    pub(crate) fn reset_items(&self) {
        self.items.borrow_mut().clear();
        *self.total_items.borrow_mut() = 0;
        *self.cursor.borrow_mut() = PageCursor::default();
        *self.phase.borrow_mut() = CartPhase::Empty;
        *self.has_loaded.borrow_mut() = false;
        *self.error.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, quantity: u32) -> CartItem {
        CartItem {
            animal_id: id.into(),
            animal_name: format!("Animal {}", id),
            price,
            quantity,
            image_url: None,
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let state = CartState::new();
        state.apply_page(
            &CartId::new("cart-1"),
            CartPage {
                items: vec![item("1", 100.0, 1), item("2", 50.0, 2)],
                total_items: 2,
                total_pages: 1,
            },
            1,
        );
        state.upsert_item(item("1", 100.0, 4));
        let ids: Vec<_> = state.get_items().into_iter().map(|i| i.quantity).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(state.get_total_items(), 2);
        assert_eq!(state.total(), 500.0);

        state.upsert_item(item("3", 10.0, 1));
        assert_eq!(state.get_items().last().unwrap().animal_id, "3");
        assert_eq!(state.get_total_items(), 3);
    }

    #[test]
    fn test_settle_depends_on_prior_load() {
        let state = CartState::new();
        state.begin(CartPhase::Loading);
        state.settle();
        assert_eq!(state.get_phase(), CartPhase::Empty);

        state.apply_page(
            &CartId::new("cart-1"),
            CartPage {
                items: vec![],
                total_items: 0,
                total_pages: 1,
            },
            1,
        );
        state.begin(CartPhase::Mutating);
        state.settle();
        assert_eq!(state.get_phase(), CartPhase::Loaded);
    }

    #[test]
    fn test_apply_page_switches_cart_with_items() {
        let state = CartState::new();
        state.set_cart_id(Some(CartId::new("cart-1")));
        state.upsert_item(item("1", 5.0, 1));

        state.apply_page(
            &CartId::new("cart-2"),
            CartPage {
                items: vec![item("9", 2.0, 3)],
                total_items: 1,
                total_pages: 2,
            },
            2,
        );
        assert!(state.is_active(&CartId::new("cart-2")));
        assert_eq!(state.get_items()[0].animal_id, "9");
        assert_eq!(state.get_cursor().current_page(), 2);
        assert_eq!(state.total(), 6.0);
    }

    #[test]
    fn test_switching_cart_resets_items() {
        let state = CartState::new();
        state.set_cart_id(Some(CartId::new("cart-1")));
        state.upsert_item(item("1", 5.0, 1));
        state.set_cart_id(Some(CartId::new("cart-1")));
        assert_eq!(state.get_items().len(), 1);

        state.set_cart_id(Some(CartId::new("cart-2")));
        assert!(state.get_items().is_empty());
        assert_eq!(state.get_phase(), CartPhase::Empty);
    }
}
