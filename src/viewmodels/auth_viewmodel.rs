// ============================================================================
// AUTH VIEWMODEL - Login, logout, token expiry, route authorization
// ============================================================================
// Token expiry is checked client-side only to drop sessions that are known
// to be stale. The API still authorizes every request.
// ============================================================================

use std::rc::Rc;

use crate::error::{AppError, AppResult, AuthFailure};
use crate::models::auth::{Credentials, ProfileUpdate, Registration, Role, User};
use crate::models::Route;
use crate::services::{ApiClient, InFlight, RequestTracker};
use crate::state::{AppState, UpdateType};
use crate::utils::jwt;
use crate::utils::{load_json, save_json, KeyValueStore, TOKEN_KEY, UNKNOWN_ROLE_ERROR, USER_KEY};

const PROFILE_KEY: &str = "auth:profile";

/// Outcome of a route check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Route),
}

#[derive(Clone)]
pub struct AuthViewModel {
    state: AppState,
    api: ApiClient,
    storage: Rc<dyn KeyValueStore>,
    tracker: RequestTracker,
    in_flight: InFlight,
}

impl AuthViewModel {
    pub fn new(state: AppState, api: ApiClient, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            state,
            api,
            storage,
            tracker: RequestTracker::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Restore a persisted session, then drop it if the token has expired.
    pub fn hydrate(&self) {
        let token = self.storage.get(TOKEN_KEY).ok().flatten();
        let user: Option<User> = load_json(self.storage.as_ref(), USER_KEY);
        if token.is_none() && user.is_some() {
            log::warn!("⚠️ Stored user without token, discarding");
            self.forget_stored_session();
        }
        self.state.session.set_session(token, user);
        if !self.check_and_expire() && self.state.session.is_authenticated() {
            log::info!("🔑 Session restored from storage");
        }
        self.state.notify_subscribers(UpdateType::Session);
    }

    /// Sign in and return the dashboard for the user's role.
    pub async fn login(&self, credentials: Credentials) -> AppResult<Route> {
        let session = &self.state.session;
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            let err = AppError::validation("Email and password are required");
            session.set_error(Some(err.user_message()));
            self.state.notify_subscribers(UpdateType::Session);
            return Err(err);
        }

        session.set_loading(true);
        session.set_error(None);
        self.state.notify_subscribers(UpdateType::Session);

        let result = self.api.login(&credentials).await;
        session.set_loading(false);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ Login failed: {}", e);
                session.set_error(Some(e.user_message()));
                self.state.notify_subscribers(UpdateType::Session);
                return Err(e);
            }
        };

        let role = response.user.role_kind();
        self.persist(&response.token, &response.user);
        session.set_session(Some(response.token), Some(response.user));

        let outcome = match role {
            Some(role) => {
                log::info!("✅ Logged in as {}", role);
                Ok(Route::home_for(role))
            }
            None => {
                log::warn!("⚠️ Login returned an unknown role");
                session.set_error(Some(UNKNOWN_ROLE_ERROR.to_string()));
                Err(AppError::validation(UNKNOWN_ROLE_ERROR))
            }
        };
        self.state.notify_subscribers(UpdateType::Session);
        outcome
    }

    /// Create a customer or vendor account. Does not sign in.
    pub async fn register(&self, registration: Registration) -> AppResult<()> {
        if registration.role == Role::Admin {
            return Err(AppError::validation(
                "Admin accounts are created from the admin dashboard",
            ));
        }
        validate_registration(&registration)?;
        self.api.register(&registration, None).await?;
        log::info!("✅ Registered {} account", registration.role);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Fetch the signed-in user's details and refresh the stored copy.
    pub async fn load_profile(&self) -> AppResult<User> {
        let token = self.bearer().map_err(|e| self.profile_failed(e))?;
        let ticket = self.tracker.begin(PROFILE_KEY);

        match self.api.current_user(Some(&token)).await {
            Ok(user) => {
                if self.tracker.accept(&ticket) {
                    self.apply_user(&token, user.clone());
                }
                Ok(user)
            }
            Err(e) if self.tracker.is_current(&ticket) => Err(self.profile_failed(e)),
            Err(e) => Err(self.handle_error(e)),
        }
    }

    /// Save name and email, plus farm name and phone number for vendors.
    /// The session user changes only once the server confirms.
    pub async fn update_profile(&self, update: ProfileUpdate) -> AppResult<User> {
        update.validate().map_err(|e| self.profile_failed(e))?;
        let token = self.bearer().map_err(|e| self.profile_failed(e))?;
        let current = self
            .state
            .session
            .get_user()
            .ok_or_else(|| self.profile_failed(AppError::validation("Profile is not loaded")))?;
        let update = update.for_role(current.role_kind());
        let _guard = self.in_flight.acquire(PROFILE_KEY, "Updating profile")?;

        let saved = self
            .api
            .update_user(current.id, &update, Some(&token))
            .await
            .map_err(|e| self.profile_failed(e))?;
        self.tracker.supersede(PROFILE_KEY);
        self.apply_user(&token, saved.clone());
        log::info!("✅ Profile {} updated", saved.id);
        Ok(saved)
    }

    pub fn logout(&self) {
        log::info!("👋 Logout");
        self.state.session.clear();
        self.state.session.set_error(None);
        self.forget_stored_session();
        self.state.notify_subscribers(UpdateType::Session);
    }

    pub fn is_expired(&self, token: &str) -> bool {
        jwt::is_expired(token)
    }

    /// Log out if the stored token is expired. Returns true if it did.
    pub fn check_and_expire(&self) -> bool {
        match self.state.session.get_token() {
            Some(token) if self.is_expired(&token) => {
                log::info!("⌛ Token expired, clearing session");
                self.logout();
                true
            }
            _ => false,
        }
    }

    /// Login when there is no token; Unauthorized when `required_roles`
    /// is non-empty and does not contain the user's role.
    pub fn authorize(&self, required_roles: &[Role]) -> Access {
        let session = &self.state.session;
        if !session.is_authenticated() {
            return Access::Redirect(Route::Login);
        }
        if required_roles.is_empty() {
            return Access::Granted;
        }
        match session.get_role() {
            Some(role) if required_roles.contains(&role) => Access::Granted,
            _ => Access::Redirect(Route::Unauthorized),
        }
    }

    /// Check run before a view opens.
    pub fn guard(&self, route: &Route) -> Access {
        self.check_and_expire();
        match route.required_roles() {
            None => Access::Granted,
            Some(roles) => self.authorize(roles),
        }
    }

    /// Token for an authenticated request. Fails locally when absent or
    /// known to be expired.
    pub fn bearer(&self) -> AppResult<String> {
        if self.check_and_expire() {
            return Err(AppError::Auth(AuthFailure::Expired));
        }
        self.state
            .session
            .get_token()
            .ok_or(AppError::Auth(AuthFailure::MissingToken))
    }

    /// Token if signed in, for endpoints that accept anonymous calls.
    pub fn optional_bearer(&self) -> Option<String> {
        self.bearer().ok()
    }

    /// End the session on auth failures. Returns the error unchanged.
    pub fn handle_error(&self, err: AppError) -> AppError {
        if err.is_auth() && self.state.session.is_authenticated() {
            log::warn!("🔒 {}, signing out", err);
            self.logout();
        }
        err
    }

    /// Replace the session user, unless the session changed meanwhile.
    fn apply_user(&self, token: &str, user: User) {
        if self.state.session.get_token().as_deref() != Some(token) {
            log::debug!("⏭️ Session changed, profile not applied");
            return;
        }
        self.persist(token, &user);
        self.state.session.set_session(Some(token.to_string()), Some(user));
        self.state.session.set_error(None);
        self.state.notify_subscribers(UpdateType::Session);
    }

    fn profile_failed(&self, err: AppError) -> AppError {
        log::warn!("⚠️ Profile: {}", err);
        self.state.session.set_error(Some(err.user_message()));
        self.state.notify_subscribers(UpdateType::Session);
        self.handle_error(err)
    }

    fn persist(&self, token: &str, user: &User) {
        let result = self
            .storage
            .set(TOKEN_KEY, token)
            .and_then(|_| save_json(self.storage.as_ref(), USER_KEY, user));
        if let Err(e) = result {
            log::warn!("⚠️ Session not persisted: {}", e);
        }
    }

    fn forget_stored_session(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("⚠️ Could not remove '{}': {}", key, e);
            }
        }
    }
}

pub(crate) fn validate_registration(registration: &Registration) -> AppResult<()> {
    if registration.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if !registration.email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if registration.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    Ok(())
}
