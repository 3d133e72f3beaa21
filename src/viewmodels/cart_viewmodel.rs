// ============================================================================
// CART VIEWMODEL - Paged cart with server-confirmed mutations
// ============================================================================
// Local state changes only after the server acknowledges a mutation, and
// the server's quantity is the one displayed. One mutation per cart may be
// pending; reads are last-response-wins per cart.
// ============================================================================

use std::rc::Rc;

use crate::error::{AppError, AppResult};
use crate::models::cart::{CartId, CartItem};
use crate::services::{ApiClient, InFlight, RequestTracker};
use crate::state::{AppState, CartPhase, UpdateType};
use crate::utils::{KeyValueStore, CART_ID_KEY, CART_ID_PREFIX};
use crate::viewmodels::AuthViewModel;

#[derive(Clone)]
pub struct CartViewModel {
    state: AppState,
    api: ApiClient,
    auth: AuthViewModel,
    session_store: Rc<dyn KeyValueStore>,
    tracker: RequestTracker,
    in_flight: InFlight,
    page_size: u32,
}

impl CartViewModel {
    pub fn new(
        state: AppState,
        api: ApiClient,
        auth: AuthViewModel,
        session_store: Rc<dyn KeyValueStore>,
        page_size: u32,
    ) -> Self {
        Self {
            state,
            api,
            auth,
            session_store,
            tracker: RequestTracker::new(),
            in_flight: InFlight::new(),
            page_size: page_size.max(1),
        }
    }

    // ------------------------------------------------------------------
    // Active cart
    // ------------------------------------------------------------------

    /// New `cart-<n>` id, remembered for this tab and made active.
    pub fn start_shopping(&self) -> CartId {
        let b = uuid::Uuid::new_v4().into_bytes();
        let seed = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        let cart_id = CartId::new(format!("{}-{}", CART_ID_PREFIX, seed % 1_000_000));

        if let Err(e) = self.session_store.set(CART_ID_KEY, cart_id.as_str()) {
            log::warn!("⚠️ Cart id not persisted: {}", e);
        }
        log::info!("🛒 Started cart {}", cart_id);
        self.state.cart.set_cart_id(Some(cart_id.clone()));
        self.state.notify_subscribers(UpdateType::Cart);
        cart_id
    }

    /// Re-activate the cart remembered for this tab, if any.
    pub fn resume(&self) -> Option<CartId> {
        let stored = self
            .session_store
            .get(CART_ID_KEY)
            .ok()
            .flatten()
            .filter(|id| !id.trim().is_empty())
            .map(CartId::new)?;
        self.state.cart.set_cart_id(Some(stored.clone()));
        self.state.notify_subscribers(UpdateType::Cart);
        Some(stored)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Load one page of `cart_id`. It becomes the active cart only once
    /// the page arrives; a failed fetch leaves the current cart as it was.
    pub async fn fetch_page(&self, cart_id: &CartId, page: u32) -> AppResult<()> {
        let owner = match cart_id.owner_id() {
            Ok(owner) => owner.to_string(),
            Err(e) => return Err(self.fail(e)),
        };

        let cart_ticket = self.tracker.begin(&tracking_key(cart_id));
        let view_ticket = self.tracker.begin(VIEW_KEY);
        if !self.is_mutating() {
            self.state.cart.begin(CartPhase::Loading);
        }
        self.state.notify_subscribers(UpdateType::Cart);

        log::debug!("🛒 Fetching {} page {}", cart_id, page);
        let result = self
            .api
            .cart_page(&owner, page, self.page_size, self.auth.optional_bearer().as_deref())
            .await;

        let current = self.tracker.is_current(&cart_ticket) && self.tracker.is_current(&view_ticket);
        let outcome = match result {
            Ok(cart_page) => {
                if current {
                    self.tracker.accept(&cart_ticket);
                    self.tracker.accept(&view_ticket);
                    self.state.cart.apply_page(cart_id, cart_page, page);
                    self.state.cart.set_error(None);
                } else {
                    log::debug!("⏭️ Discarding stale page of {}", cart_id);
                }
                Ok(())
            }
            Err(e) if current => Err(self.fail(e)),
            Err(e) => Err(self.auth.handle_error(e)),
        };
        self.settle();
        outcome
    }

    /// Fetch `new_page` of the active cart. Pages outside
    /// `[1, total_pages]` are ignored.
    pub async fn change_page(&self, new_page: u32) -> AppResult<()> {
        let cursor = self.state.cart.get_cursor();
        if !cursor.contains(new_page) {
            log::debug!("⏭️ Page {} outside 1..={}", new_page, cursor.total_pages());
            return Ok(());
        }
        let cart_id = self.active_cart()?;
        self.fetch_page(&cart_id, new_page).await
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add `animal_id` or set its quantity. `available` is the stock shown
    /// to the user; zero is rejected before the quantity is checked.
    pub async fn add_or_update_item(
        &self,
        animal_id: &str,
        quantity: &str,
        available: Option<u32>,
    ) -> AppResult<CartItem> {
        if available == Some(0) {
            return Err(self.fail(AppError::StockExhausted {
                animal_id: animal_id.to_string(),
            }));
        }
        let quantity = parse_quantity(quantity).map_err(|e| self.fail(e))?;
        let (cart_id, owner) = self.active_owner()?;

        let key = tracking_key(&cart_id);
        let _guard = self.in_flight.acquire(&key, "Cart update")?;
        self.begin_mutation();

        let result = self
            .api
            .add_cart_item(&owner, animal_id, quantity, self.auth.optional_bearer().as_deref())
            .await;

        let outcome = match result {
            Ok(item) => {
                self.tracker.supersede(&key);
                if self.state.cart.is_active(&cart_id) {
                    if item.quantity == 0 {
                        self.state.cart.remove_item(&item.animal_id);
                    } else {
                        self.state.cart.upsert_item(item.clone());
                    }
                    self.state.cart.set_error(None);
                }
                log::info!("✅ {} × {} in {}", item.quantity, item.animal_id, cart_id);
                Ok(item)
            }
            Err(e) => Err(self.fail_for(&cart_id, e)),
        };
        drop(_guard);
        self.settle();
        self.state.notify_subscribers(UpdateType::Cart);
        outcome
    }

    /// Quantity edit for an item already in the loaded page.
    pub async fn update_quantity(&self, animal_id: &str, quantity: &str) -> AppResult<CartItem> {
        if self.state.cart.item(animal_id).is_none() {
            return Err(self.fail(AppError::validation("Item is not in the cart")));
        }
        self.add_or_update_item(animal_id, quantity, None).await
    }

    /// Removed locally only after the server confirms.
    pub async fn remove_item(&self, animal_id: &str) -> AppResult<()> {
        let (cart_id, owner) = self.active_owner()?;
        let key = tracking_key(&cart_id);
        let _guard = self.in_flight.acquire(&key, "Cart update")?;
        self.begin_mutation();

        let result = self
            .api
            .remove_cart_item(&owner, animal_id, self.auth.optional_bearer().as_deref())
            .await;

        let outcome = match result {
            Ok(()) => {
                self.tracker.supersede(&key);
                if self.state.cart.is_active(&cart_id) {
                    self.state.cart.remove_item(animal_id);
                    self.state.cart.set_error(None);
                }
                log::info!("🗑️ Removed {} from {}", animal_id, cart_id);
                Ok(())
            }
            Err(e) => Err(self.fail_for(&cart_id, e)),
        };
        drop(_guard);
        self.settle();
        self.state.notify_subscribers(UpdateType::Cart);
        outcome
    }

    /// Place the order. Sent exactly once; the cart is cleared only on
    /// success. Returns the order id.
    pub async fn checkout(&self, cart_id: &CartId) -> AppResult<String> {
        let owner = cart_id.owner_id().map_err(|e| self.fail(e))?.to_string();
        let key = tracking_key(cart_id);
        let _guard = self.in_flight.acquire(&key, "Checkout")?;
        self.begin_mutation();

        let result = self
            .api
            .checkout(&owner, self.auth.optional_bearer().as_deref())
            .await;

        let outcome = match result {
            Ok(order) => {
                self.tracker.supersede(&key);
                if self.state.cart.is_active(cart_id) {
                    self.state.cart.reset_items();
                }
                log::info!("📦 Order {} placed", order.id);
                Ok(order.id)
            }
            Err(e) => Err(self.fail_for(cart_id, e)),
        };
        drop(_guard);
        self.settle();
        self.state.notify_subscribers(UpdateType::Cart);
        outcome
    }

    pub fn is_mutating(&self) -> bool {
        self.state
            .cart
            .get_cart_id()
            .map_or(false, |id| self.in_flight.is_busy(&tracking_key(&id)))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn active_cart(&self) -> AppResult<CartId> {
        self.state
            .cart
            .get_cart_id()
            .ok_or_else(|| self.fail(AppError::validation("No active cart")))
    }

    fn active_owner(&self) -> AppResult<(CartId, String)> {
        let cart_id = self.active_cart()?;
        let owner = cart_id.owner_id().map_err(|e| self.fail(e))?.to_string();
        Ok((cart_id, owner))
    }

    fn begin_mutation(&self) {
        self.state.cart.begin(CartPhase::Mutating);
        self.state.cart.set_error(None);
        self.state.notify_subscribers(UpdateType::Cart);
    }

    fn settle(&self) {
        if self.is_mutating() {
            self.state.cart.begin(CartPhase::Mutating);
        } else {
            self.state.cart.settle();
        }
        self.state.notify_subscribers(UpdateType::Cart);
    }

    /// Record a failure on the cart; auth failures also end the session.
    fn fail(&self, err: AppError) -> AppError {
        log::warn!("⚠️ Cart: {}", err);
        self.state.cart.set_error(Some(err.user_message()));
        self.state.notify_subscribers(UpdateType::Cart);
        self.auth.handle_error(err)
    }

    /// Like `fail`, but the message is shown only while `cart_id` is still
    /// the active cart.
    fn fail_for(&self, cart_id: &CartId, err: AppError) -> AppError {
        if self.state.cart.is_active(cart_id) {
            self.fail(err)
        } else {
            log::warn!("⚠️ Cart {}: {}", cart_id, err);
            self.auth.handle_error(err)
        }
    }
}

/// Ordering key shared by every cart read, so switching carts is also
/// last-response-wins.
const VIEW_KEY: &str = "cart:view";

fn tracking_key(cart_id: &CartId) -> String {
    format!("cart:{}", cart_id)
}

/// Positive whole number of animals.
pub fn parse_quantity(raw: &str) -> AppResult<u32> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => {
            u32::try_from(n).map_err(|_| AppError::validation("Quantity is too large"))
        }
        _ => Err(AppError::validation("Quantity must be a whole number of at least 1")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{ok, MockTransport};
    use crate::services::Method;
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;
    use serde_json::json;

    struct Fixture {
        vm: CartViewModel,
        state: AppState,
        mock: MockTransport,
        tab: MemoryStorage,
    }

    fn fixture() -> Fixture {
        let state = AppState::new();
        let mock = MockTransport::new();
        let api = ApiClient::new(Rc::new(mock.clone()));
        let auth = AuthViewModel::new(state.clone(), api.clone(), Rc::new(MemoryStorage::new()));
        let tab = MemoryStorage::new();
        let vm = CartViewModel::new(state.clone(), api, auth, Rc::new(tab.clone()), 10);
        Fixture {
            vm,
            state,
            mock,
            tab,
        }
    }

    fn item_json(id: &str, price: f64, quantity: u32) -> serde_json::Value {
        json!({ "animal_id": id, "animal_name": "Boran", "animal_price": price, "quantity": quantity })
    }

    fn page_json(items: Vec<serde_json::Value>, total_pages: u32) -> serde_json::Value {
        let total = items.len();
        json!({ "status": "success", "cart_items": items, "total_items": total, "total_pages": total_pages })
    }

    fn with_cart(f: &Fixture) -> CartId {
        let cart = CartId::new("cart-42");
        f.state.cart.set_cart_id(Some(cart.clone()));
        cart
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
        for bad in ["0", "-2", "abc", "", "1.5"] {
            assert!(matches!(parse_quantity(bad), Err(AppError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn test_fetch_page_replaces_items_and_cursor() {
        let f = fixture();
        f.mock.respond(
            200,
            page_json(vec![item_json("1", 100.0, 2), item_json("2", 50.0, 1)], 3),
        );

        block_on(f.vm.fetch_page(&CartId::new("cart-42"), 2)).unwrap();
        let cart = &f.state.cart;
        assert_eq!(cart.get_items().len(), 2);
        assert_eq!(cart.total(), 250.0);
        assert_eq!(cart.get_cursor().current_page(), 2);
        assert_eq!(cart.get_cursor().total_pages(), 3);
        assert_eq!(cart.get_phase(), CartPhase::Loaded);

        let sent = f.mock.last_request().unwrap();
        assert_eq!(sent.path, "/cart/42/items");
        assert_eq!(
            sent.query,
            vec![("page".to_string(), "2".to_string()), ("per_page".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_fetch_page_malformed_response_keeps_items() {
        let f = fixture();
        let cart = CartId::new("cart-42");
        f.mock.respond(200, page_json(vec![item_json("1", 100.0, 2)], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.respond(200, json!({ "status": "error" }));
        let err = block_on(f.vm.fetch_page(&cart, 1)).unwrap_err();
        assert!(matches!(err, AppError::DataShape(_)));
        assert_eq!(f.state.cart.get_items().len(), 1);
        assert_eq!(f.state.cart.get_phase(), CartPhase::Loaded);
        assert!(f.state.cart.get_error().is_some());
    }

    #[test]
    fn test_failed_switch_keeps_current_cart() {
        let f = fixture();
        let cart = CartId::new("cart-42");
        f.mock.respond(200, page_json(vec![item_json("1", 100.0, 2)], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.fail_network();
        let err = block_on(f.vm.fetch_page(&CartId::new("cart-43"), 1)).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(f.state.cart.get_cart_id(), Some(cart));
        assert_eq!(f.state.cart.get_items().len(), 1);
        assert_eq!(f.state.cart.get_phase(), CartPhase::Loaded);
    }

    #[test]
    fn test_switch_then_older_page_of_previous_cart_is_discarded() {
        let f = fixture();
        let old_cart = with_cart(&f);
        let slow = f.mock.gate();
        let fast = f.mock.gate();

        let first = f.vm.fetch_page(&old_cart, 1);
        let new_cart = CartId::new("cart-43");
        let second = f.vm.fetch_page(&new_cart, 1);
        let release = async {
            let _ = fast.send(ok(200, page_json(vec![item_json("new", 1.0, 1)], 1)));
            futures::pending!();
            let _ = slow.send(ok(200, page_json(vec![item_json("old", 1.0, 1)], 1)));
        };
        let (a, b, _) = block_on(async { futures::join!(first, second, release) });
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(f.state.cart.get_cart_id(), Some(CartId::new("cart-43")));
        assert_eq!(f.state.cart.get_items()[0].animal_id, "new");
    }

    #[test]
    fn test_ack_for_previous_cart_is_not_applied_after_switch() {
        let f = fixture();
        with_cart(&f);
        let add_gate = f.mock.gate();
        f.mock.respond(200, page_json(vec![], 1));

        let add = f.vm.add_or_update_item("1", "2", None);
        let switch = async {
            f.vm.fetch_page(&CartId::new("cart-43"), 1).await.unwrap();
            let _ = add_gate.send(ok(201, json!({ "cart_item": item_json("1", 10.0, 2) })));
        };
        let (result, _) = block_on(async { futures::join!(add, switch) });
        assert_eq!(result.unwrap().quantity, 2);
        assert_eq!(f.state.cart.get_cart_id(), Some(CartId::new("cart-43")));
        assert!(f.state.cart.get_items().is_empty());
        assert_eq!(f.state.cart.get_total_items(), 0);
    }

    #[test]
    fn test_unresolvable_cart_id_sends_nothing() {
        let f = fixture();
        let err = block_on(f.vm.fetch_page(&CartId::new("basket"), 1)).unwrap_err();
        assert!(matches!(err, AppError::DataShape(_)));
        assert_eq!(f.mock.request_count(), 0);
    }

    #[test]
    fn test_add_rejects_bad_quantity_and_empty_stock_locally() {
        let f = fixture();
        with_cart(&f);

        for bad in ["0", "-1", "two"] {
            let err = block_on(f.vm.add_or_update_item("7", bad, Some(3))).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        let err = block_on(f.vm.add_or_update_item("7", "abc", Some(0))).unwrap_err();
        assert_eq!(err, AppError::StockExhausted { animal_id: "7".into() });
        assert_eq!(f.mock.request_count(), 0);
    }

    #[test]
    fn test_server_quantity_wins() {
        let f = fixture();
        with_cart(&f);
        f.mock.respond(201, json!({ "cart_item": item_json("7", 1000.0, 2) }));

        let item = block_on(f.vm.add_or_update_item("7", "5", Some(9))).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(f.state.cart.item("7").unwrap().quantity, 2);
        assert_eq!(f.state.cart.total(), 2000.0);

        let body = f.mock.last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({ "animal_id": 7, "quantity": 5 }));
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let f = fixture();
        with_cart(&f);
        assert_eq!(f.state.cart.get_phase(), CartPhase::Empty);

        f.mock.respond(201, json!({ "cart_item": item_json("animal-7", 4500.0, 2) }));
        block_on(f.vm.add_or_update_item("animal-7", "2", None)).unwrap();
        assert_eq!(f.state.cart.total(), 9000.0);
        assert_eq!(f.state.cart.get_phase(), CartPhase::Loaded);

        f.mock.respond(200, json!({ "status": "success" }));
        block_on(f.vm.remove_item("animal-7")).unwrap();
        assert!(f.state.cart.get_items().is_empty());
        assert_eq!(f.state.cart.total(), 0.0);

        let sent = f.mock.last_request().unwrap();
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(sent.path, "/cart/42/items/animal-7");
    }

    #[test]
    fn test_update_in_place_keeps_order() {
        let f = fixture();
        let cart = with_cart(&f);
        f.mock.respond(
            200,
            page_json(vec![item_json("1", 10.0, 1), item_json("2", 20.0, 1)], 1),
        );
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.respond(201, json!({ "cart_item": item_json("1", 10.0, 3) }));
        block_on(f.vm.update_quantity("1", "3")).unwrap();
        let ids: Vec<_> = f.state.cart.get_items().into_iter().map(|i| i.animal_id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(f.state.cart.total(), 50.0);

        let err = block_on(f.vm.update_quantity("9", "1")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_remove_failure_leaves_items() {
        let f = fixture();
        let cart = with_cart(&f);
        f.mock.respond(200, page_json(vec![item_json("1", 10.0, 1)], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.respond(500, json!({ "error": "Database unavailable" }));
        let err = block_on(f.vm.remove_item("1")).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(f.state.cart.get_items().len(), 1);
        assert_eq!(
            f.state.cart.get_error().as_deref(),
            Some("Database unavailable")
        );
    }

    #[test]
    fn test_checkout_clears_cart_once() {
        let f = fixture();
        let cart = with_cart(&f);
        f.mock.respond(200, page_json(vec![item_json("1", 10.0, 1)], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.respond(201, json!({ "order": { "id": 99, "total_price": 10.0 } }));
        assert_eq!(block_on(f.vm.checkout(&cart)).unwrap(), "99");
        assert!(f.state.cart.get_items().is_empty());
        assert_eq!(f.mock.request_count(), 2);
    }

    #[test]
    fn test_checkout_failure_is_not_retried() {
        let f = fixture();
        let cart = with_cart(&f);
        f.mock.respond(200, page_json(vec![item_json("1", 10.0, 1)], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        f.mock.respond(503, json!({}));
        let err = block_on(f.vm.checkout(&cart)).unwrap_err();
        assert_eq!(err, AppError::transport(Some(503), "Failed to checkout"));
        assert_eq!(f.state.cart.get_items().len(), 1);
        assert_eq!(f.mock.request_count(), 2);
    }

    #[test]
    fn test_change_page_out_of_range_is_noop() {
        let f = fixture();
        let cart = with_cart(&f);
        f.mock.respond(200, page_json(vec![item_json("1", 10.0, 1)], 2));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();

        block_on(f.vm.change_page(0)).unwrap();
        block_on(f.vm.change_page(3)).unwrap();
        assert_eq!(f.mock.request_count(), 1);

        f.mock.respond(200, page_json(vec![item_json("2", 10.0, 1)], 2));
        block_on(f.vm.change_page(2)).unwrap();
        assert_eq!(f.state.cart.get_cursor().current_page(), 2);
        assert_eq!(f.mock.request_count(), 2);
    }

    #[test]
    fn test_second_mutation_while_pending_is_rejected() {
        let f = fixture();
        with_cart(&f);
        let gate = f.mock.gate();

        let first = f.vm.add_or_update_item("1", "1", None);
        let second = async {
            assert!(f.vm.is_mutating());
            let err = f.vm.checkout(&CartId::new("cart-42")).await.unwrap_err();
            assert_eq!(err, AppError::InFlight("Checkout".into()));
            let _ = gate.send(ok(201, json!({ "cart_item": item_json("1", 10.0, 1) })));
        };
        let (result, _) = block_on(async { futures::join!(first, second) });
        assert!(result.is_ok());
        assert_eq!(f.mock.request_count(), 1);
        assert!(!f.vm.is_mutating());
    }

    #[test]
    fn test_older_page_response_is_discarded() {
        let f = fixture();
        let cart = with_cart(&f);
        let slow = f.mock.gate();
        let fast = f.mock.gate();

        let first = f.vm.fetch_page(&cart, 1);
        let second = f.vm.fetch_page(&cart, 2);
        let release = async {
            let _ = fast.send(ok(200, page_json(vec![item_json("new", 1.0, 1)], 2)));
            futures::pending!();
            let _ = slow.send(ok(200, page_json(vec![item_json("old", 1.0, 1)], 2)));
        };
        let (a, b, _) = block_on(async { futures::join!(first, second, release) });
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(f.state.cart.get_items()[0].animal_id, "new");
        assert_eq!(f.state.cart.get_cursor().current_page(), 2);
    }

    #[test]
    fn test_read_started_before_mutation_does_not_overwrite_it() {
        let f = fixture();
        let cart = with_cart(&f);
        let read_gate = f.mock.gate();
        f.mock.respond(201, json!({ "cart_item": item_json("1", 10.0, 4) }));

        let read = f.vm.fetch_page(&cart, 1);
        let mutate = async {
            let item = f.vm.add_or_update_item("1", "4", None).await.unwrap();
            assert_eq!(item.quantity, 4);
            let _ = read_gate.send(ok(200, page_json(vec![item_json("1", 10.0, 1)], 1)));
        };
        let (result, _) = block_on(async { futures::join!(read, mutate) });
        assert!(result.is_ok());
        assert_eq!(f.state.cart.item("1").unwrap().quantity, 4);
    }

    #[test]
    fn test_start_shopping_and_resume() {
        let f = fixture();
        let cart = f.vm.start_shopping();
        assert!(cart.as_str().starts_with("cart-"));
        assert!(cart.owner_id().is_ok());
        assert_eq!(f.tab.get(CART_ID_KEY).unwrap().as_deref(), Some(cart.as_str()));

        let g = fixture();
        assert!(g.vm.resume().is_none());
        g.tab.set(CART_ID_KEY, "cart-7").unwrap();
        assert_eq!(g.vm.resume(), Some(CartId::new("cart-7")));
        assert_eq!(g.state.cart.get_cart_id(), Some(CartId::new("cart-7")));
    }

    #[test]
    fn test_bearer_sent_when_signed_in() {
        let f = fixture();
        let cart = with_cart(&f);
        let token = crate::utils::jwt::make_token(&json!({ "exp": crate::utils::jwt::now_millis() / 1000 + 600 }));
        f.state.session.set_session(Some(token.clone()), None);
        f.mock.respond(200, page_json(vec![], 1));
        block_on(f.vm.fetch_page(&cart, 1)).unwrap();
        assert_eq!(f.mock.last_request().unwrap().bearer, Some(token));
    }
}
