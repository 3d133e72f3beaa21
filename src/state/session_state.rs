// ============================================================================
// SESSION STATE - Signed-in user and token
// ============================================================================
// Invariant: a user is present only while a token is present. Both are
// written together through `set_session`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::auth::{Role, User};

#[derive(Clone, Default)]
pub struct SessionState {
    token: Rc<RefCell<Option<String>>>,
    user: Rc<RefCell<Option<User>>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or clear the session. A user without a token is dropped.
    pub(crate) fn set_session(&self, token: Option<String>, user: Option<User>) {
        let token = token.filter(|t| !t.is_empty());
        let user = if token.is_some() { user } else { None };
        *self.token.borrow_mut() = token;
        *self.user.borrow_mut() = user;
    }

    pub(crate) fn clear(&self) {
        self.set_session(None, None);
    }

    pub fn get_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn get_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn get_role(&self) -> Option<Role> {
        self.user.borrow().as_ref().and_then(User::role_kind)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        *self.loading.borrow_mut() = loading;
    }

    pub fn get_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub(crate) fn set_error(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}
