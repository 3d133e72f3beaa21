use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::ids::string_or_number;
use crate::utils::CART_ID_PREFIX;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct CartItem {
    #[serde(deserialize_with = "string_or_number")]
    pub animal_id: String,
    #[serde(default)]
    pub animal_name: String,
    #[serde(alias = "animal_price")]
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Sum of `price * quantity` over the given items.
pub fn page_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::subtotal).sum()
}

/// Cart identifier. Client-generated ids look like `cart-<owner>`; a bare
/// numeric id is taken as the owner id itself.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct CartId(String);

impl CartId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn for_owner(owner_id: impl std::fmt::Display) -> Self {
        Self(format!("{}-{}", CART_ID_PREFIX, owner_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owner (user) id used in `/cart/{userId}/…` paths.
    pub fn owner_id(&self) -> AppResult<&str> {
        let raw = self.0.trim();
        let owner = match raw.split_once('-') {
            Some((_, rest)) => rest.split('-').next().unwrap_or(""),
            None if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) => raw,
            None => "",
        };
        if owner.is_empty() {
            return Err(AppError::data_shape(format!(
                "cart id '{}' does not name an owner",
                self.0
            )));
        }
        Ok(owner)
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw body of `GET /cart/{userId}/items`
#[derive(Clone, Deserialize, Debug)]
pub struct CartPageResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cart_items: Option<Vec<CartItem>>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct CartPage {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_pages: u32,
}

impl CartPageResponse {
    pub fn into_page(self) -> AppResult<CartPage> {
        if self.status.as_deref() != Some("success") {
            return Err(AppError::data_shape("Cart data is malformed"));
        }
        let items = self
            .cart_items
            .ok_or_else(|| AppError::data_shape("Cart data is malformed"))?;
        Ok(CartPage {
            total_items: self.total_items.unwrap_or(items.len() as u32),
            total_pages: self.total_pages.unwrap_or(1).max(1),
            items,
        })
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct AddItemRequest {
    pub animal_id: serde_json::Value,
    pub quantity: u32,
}

impl AddItemRequest {
    /// Numeric ids go over the wire as numbers, anything else as a string.
    pub fn new(animal_id: &str, quantity: u32) -> Self {
        let animal_id = animal_id
            .parse::<i64>()
            .map(serde_json::Value::from)
            .unwrap_or_else(|_| serde_json::Value::from(animal_id));
        Self {
            animal_id,
            quantity,
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct AddItemResponse {
    pub cart_item: Option<CartItem>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Order {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct CheckoutResponse {
    pub order: Option<Order>,
}
