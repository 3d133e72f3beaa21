// ============================================================================
// FARMMART STOREFRONT - Client state for the livestock marketplace (WASM)
// ============================================================================
// - Models: data shared with the API
// - Services: API communication and request bookkeeping only
// - State: Rc<RefCell> state with change notifications
// - ViewModels: state + UI logic per dashboard area
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::app::App;

pub use crate::error::{AppError, AppResult};

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    use crate::config::CONFIG;

    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!("🚀 FarmMart storefront ({})", CONFIG.environment);

    let app = App::in_browser(&CONFIG);
    app.start();

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Called by the JS router before a view opens. Returns the path to
/// redirect to, or undefined when access is granted.
#[wasm_bindgen]
pub fn guard_route(path: &str) -> Option<String> {
    APP.with(|cell| match cell.borrow().as_ref() {
        Some(app) => app.guard_path(path),
        None => {
            log::warn!("⚠️ guard_route before init");
            None
        }
    })
}

#[wasm_bindgen]
pub fn logout() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow().as_ref() {
            app.auth.logout();
        }
    });
}
