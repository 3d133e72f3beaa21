use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(Role::Customer),
            "vendor" => Some(Role::Vendor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user as returned by `/login` and `/current-user`. The role is
/// kept raw so an unrecognised value can be reported instead of failing to
/// parse.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl User {
    pub fn role_kind(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// `{ "user": … }` answer of `/current-user` and `PATCH /users/{id}`
#[derive(Clone, Deserialize, Debug)]
pub struct UserEnvelope {
    pub user: User,
}

/// Editable profile fields. Farm name and phone number are sent only for
/// vendors.
#[derive(Clone, PartialEq, Serialize, Debug, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    /// Form prefilled from `user`.
    pub fn from_user(user: &User) -> Self {
        let vendor = user.role_kind() == Some(Role::Vendor);
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            farm_name: vendor.then(|| user.farm_name.clone().unwrap_or_default()),
            phone_number: vendor.then(|| user.phone_number.clone().unwrap_or_default()),
        }
    }

    /// Drop the vendor-only fields unless `role` is a vendor.
    pub fn for_role(mut self, role: Option<Role>) -> Self {
        if role != Some(Role::Vendor) {
            self.farm_name = None;
            self.phone_number = None;
        }
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if !self.email.contains('@') {
            return Err(AppError::validation("A valid email is required"));
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Page of users from `/users`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserPage {
    pub users: Vec<User>,
    #[serde(default = "one")]
    pub pages: u32,
}

fn one() -> u32 {
    1
}

/// Row of the public vendor directory
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Vendor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub farm_name: Option<String>,
}

/// Paging block of `/vendors`. The next/previous links are driven by
/// `has_next`/`has_prev`, not by the page count.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct PageMeta {
    #[serde(default = "one")]
    pub current_page: u32,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
pub struct VendorPage {
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub meta: PageMeta,
}
