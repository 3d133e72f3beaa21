// ============================================================================
// APP - Wires config, storage, transport, state and viewmodels
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::Route;
use crate::services::{ApiClient, GlooTransport, HttpTransport};
use crate::state::AppState;
use crate::utils::{BrowserStorage, KeyValueStore};
use crate::viewmodels::{
    Access, AdminViewModel, AuthViewModel, CartViewModel, CatalogViewModel, VendorViewModel,
};

pub struct App {
    state: AppState,
    pub auth: AuthViewModel,
    pub cart: CartViewModel,
    pub catalog: CatalogViewModel,
    pub vendor: VendorViewModel,
    pub admin: AdminViewModel,
}

impl App {
    /// `local` keeps the session across tabs; `tab` keeps the cart id for
    /// this tab only.
    pub fn new(
        config: &AppConfig,
        transport: Rc<dyn HttpTransport>,
        local: Rc<dyn KeyValueStore>,
        tab: Rc<dyn KeyValueStore>,
    ) -> Self {
        let state = AppState::new();
        let api = ApiClient::new(transport);
        let auth = AuthViewModel::new(state.clone(), api.clone(), local);
        let cart = CartViewModel::new(
            state.clone(),
            api.clone(),
            auth.clone(),
            tab,
            config.cart_page_size,
        );
        let catalog = CatalogViewModel::new(
            state.clone(),
            api.clone(),
            config.catalog_page_size,
            config.featured_refresh_ms,
        );
        let vendor = VendorViewModel::new(state.clone(), api.clone(), auth.clone());
        let admin = AdminViewModel::new(state.clone(), api, auth.clone(), config.users_page_size);

        Self {
            state,
            auth,
            cart,
            catalog,
            vendor,
            admin,
        }
    }

    /// Browser wiring: fetch transport, localStorage and sessionStorage.
    pub fn in_browser(config: &AppConfig) -> Self {
        log::info!("🌐 Backend: {}", config.backend_url());
        Self::new(
            config,
            Rc::new(GlooTransport::new(config.backend_url())),
            Rc::new(BrowserStorage::local()),
            Rc::new(BrowserStorage::session()),
        )
    }

    /// Restore the persisted session and this tab's cart.
    pub fn start(&self) {
        self.auth.hydrate();
        if let Some(cart_id) = self.cart.resume() {
            log::info!("🛒 Resumed cart {}", cart_id);
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Redirect path for `path`, or None when the view may open. Unknown
    /// paths are left to the router.
    pub fn guard_path(&self, path: &str) -> Option<String> {
        let route = Route::from_path(path)?;
        match self.auth.guard(&route) {
            Access::Granted => None,
            Access::Redirect(target) => {
                log::info!("🚧 {} -> {}", path, target.path());
                Some(target.path())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockTransport;
    use crate::utils::jwt::{make_token, now_millis};
    use crate::utils::{MemoryStorage, CART_ID_KEY, TOKEN_KEY, USER_KEY};
    use serde_json::json;

    fn app(local: &MemoryStorage, tab: &MemoryStorage) -> App {
        App::new(
            &AppConfig::default(),
            Rc::new(MockTransport::new()),
            Rc::new(local.clone()),
            Rc::new(tab.clone()),
        )
    }

    #[test]
    fn test_start_restores_session_and_cart() {
        let local = MemoryStorage::new();
        let tab = MemoryStorage::new();
        let token = make_token(&json!({ "exp": now_millis() / 1000 + 600 }));
        local.set(TOKEN_KEY, &token).unwrap();
        local
            .set(USER_KEY, r#"{"id":4,"name":"Amina","email":"a@farm.ke","role":"customer"}"#)
            .unwrap();
        tab.set(CART_ID_KEY, "cart-4").unwrap();

        let app = app(&local, &tab);
        app.start();
        assert!(app.state().session.is_authenticated());
        assert_eq!(app.state().cart.get_cart_id().unwrap().as_str(), "cart-4");
        assert_eq!(app.guard_path("/cart/cart-4"), None);
        assert_eq!(app.guard_path("/users").as_deref(), Some("/unauthorized"));
    }

    #[test]
    fn test_guard_path_signed_out() {
        let app = app(&MemoryStorage::new(), &MemoryStorage::new());
        app.start();
        assert_eq!(app.guard_path("/vendor/dashboard").as_deref(), Some("/login"));
        assert_eq!(app.guard_path("/login"), None);
        assert_eq!(app.guard_path("/"), None);
        assert_eq!(app.guard_path("/not/a/route"), None);
    }
}
