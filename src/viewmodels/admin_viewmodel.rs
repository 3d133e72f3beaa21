// ============================================================================
// ADMIN VIEWMODEL - User management and the vendor directory
// ============================================================================
// Lists are last-response-wins; a read started before an acknowledged
// delete is discarded.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{AppError, AppResult};
use crate::models::auth::{PageMeta, Registration, Role, User, Vendor};
use crate::models::PageCursor;
use crate::services::{ApiClient, InFlight, RequestTracker};
use crate::state::{AppState, UpdateType};
use crate::viewmodels::auth_viewmodel::validate_registration;
use crate::viewmodels::AuthViewModel;

const USERS_KEY: &str = "admin:users";
const VENDORS_KEY: &str = "admin:vendors";
const VENDORS_PAGE_SIZE: u32 = 5;

#[derive(Clone)]
pub struct AdminViewModel {
    state: AppState,
    api: ApiClient,
    auth: AuthViewModel,
    tracker: RequestTracker,
    in_flight: InFlight,
    users: Rc<RefCell<Vec<User>>>,
    cursor: Rc<RefCell<PageCursor>>,
    vendors: Rc<RefCell<Vec<Vendor>>>,
    vendor_meta: Rc<RefCell<PageMeta>>,
    error: Rc<RefCell<Option<String>>>,
    page_size: u32,
}

impl AdminViewModel {
    pub fn new(state: AppState, api: ApiClient, auth: AuthViewModel, page_size: u32) -> Self {
        Self {
            state,
            api,
            auth,
            tracker: RequestTracker::new(),
            in_flight: InFlight::new(),
            users: Rc::new(RefCell::new(Vec::new())),
            cursor: Rc::new(RefCell::new(PageCursor::default())),
            vendors: Rc::new(RefCell::new(Vec::new())),
            vendor_meta: Rc::new(RefCell::new(PageMeta::default())),
            error: Rc::new(RefCell::new(None)),
            page_size: page_size.max(1),
        }
    }

    pub fn get_users(&self) -> Vec<User> {
        self.users.borrow().clone()
    }

    pub fn get_cursor(&self) -> PageCursor {
        *self.cursor.borrow()
    }

    pub fn get_vendors(&self) -> Vec<Vendor> {
        self.vendors.borrow().clone()
    }

    pub fn get_vendor_meta(&self) -> PageMeta {
        *self.vendor_meta.borrow()
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub async fn load_users(&self, page: u32) -> AppResult<()> {
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let page = page.max(1);
        let ticket = self.tracker.begin(USERS_KEY);

        match self.api.users(page, self.page_size, Some(&token)).await {
            Ok(user_page) => {
                if self.tracker.accept(&ticket) {
                    *self.users.borrow_mut() = user_page.users;
                    *self.cursor.borrow_mut() = PageCursor::new(page, user_page.pages);
                    self.applied();
                }
                Ok(())
            }
            Err(e) if self.tracker.is_current(&ticket) => Err(self.fail(e)),
            Err(e) => Err(self.auth.handle_error(e)),
        }
    }

    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let _guard = self.in_flight.acquire(USERS_KEY, "Deleting user")?;

        self.api
            .delete_user(user_id, Some(&token))
            .await
            .map_err(|e| self.fail(e))?;
        self.tracker.supersede(USERS_KEY);
        self.users.borrow_mut().retain(|u| u.id != user_id);
        log::info!("🗑️ User {} deleted", user_id);
        self.applied();
        Ok(())
    }

    /// Register another admin account.
    pub async fn create_admin(&self, mut registration: Registration) -> AppResult<()> {
        registration.role = Role::Admin;
        validate_registration(&registration).map_err(|e| self.fail(e))?;
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;

        self.api
            .register(&registration, Some(&token))
            .await
            .map_err(|e| self.fail(e))?;
        log::info!("✅ Admin {} created", registration.email);
        self.applied();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Vendor directory
    // ------------------------------------------------------------------

    /// Load `page` of the vendor directory, five per page.
    pub async fn load_vendors(&self, page: u32) -> AppResult<()> {
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let page = page.max(1);
        let ticket = self.tracker.begin(VENDORS_KEY);

        match self.api.vendors(page, VENDORS_PAGE_SIZE, Some(&token)).await {
            Ok(vendor_page) => {
                if self.tracker.accept(&ticket) {
                    log::info!("🧑‍🌾 {} vendors on page {}", vendor_page.vendors.len(), page);
                    *self.vendors.borrow_mut() = vendor_page.vendors;
                    *self.vendor_meta.borrow_mut() = vendor_page.meta;
                    self.applied();
                }
                Ok(())
            }
            Err(e) if self.tracker.is_current(&ticket) => Err(self.fail(e)),
            Err(e) => Err(self.auth.handle_error(e)),
        }
    }

    /// Next directory page; a no-op when the server reports no next page.
    pub async fn next_vendors(&self) -> AppResult<()> {
        let meta = self.get_vendor_meta();
        if !meta.has_next {
            return Ok(());
        }
        self.load_vendors(meta.current_page + 1).await
    }

    pub async fn prev_vendors(&self) -> AppResult<()> {
        let meta = self.get_vendor_meta();
        if !meta.has_prev || meta.current_page <= 1 {
            return Ok(());
        }
        self.load_vendors(meta.current_page - 1).await
    }

    fn applied(&self) {
        *self.error.borrow_mut() = None;
        self.state.notify_subscribers(UpdateType::Users);
    }

    fn fail(&self, err: AppError) -> AppError {
        log::warn!("⚠️ Admin: {}", err);
        *self.error.borrow_mut() = Some(err.user_message());
        self.state.notify_subscribers(UpdateType::Users);
        self.auth.handle_error(err)
    }
}
