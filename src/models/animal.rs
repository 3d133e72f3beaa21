use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::ids::string_or_number;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Animal {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub available_quantity: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Animal {
    pub fn is_out_of_stock(&self) -> bool {
        self.available_quantity == Some(0)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Pagination {
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

fn one() -> u32 {
    1
}

/// A response without pagination is a single page.
impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_pages: one(),
            total_items: None,
            current_page: None,
        }
    }
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
pub struct AnimalPage {
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Breed {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct FeaturedAnimals {
    pub featured_animals: Vec<Animal>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct VendorAnimals {
    pub animals: Vec<Animal>,
}

/// Catalog listing filters. Category or breed selects `/animals/search`;
/// otherwise `/animals/filter` is used with breed and age bounds.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub breed: Option<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
}

impl CatalogQuery {
    pub fn uses_search(&self) -> bool {
        non_empty(&self.category).is_some() || non_empty(&self.breed).is_some()
    }

    /// Query parameters for the chosen endpoint, empty filters omitted.
    pub fn params(&self, page: u32, per_page: u32) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        if self.uses_search() {
            if let Some(category) = non_empty(&self.category) {
                params.push(("category".to_string(), category.to_string()));
            }
            if let Some(breed) = non_empty(&self.breed) {
                params.push(("breed".to_string(), breed.to_string()));
            }
        } else {
            if let Some(min) = self.age_min {
                params.push(("age_min".to_string(), min.to_string()));
            }
            if let Some(max) = self.age_max {
                params.push(("age_max".to_string(), max.to_string()));
            }
        }
        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Listing submitted from the vendor dashboard
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct AnimalDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: f64,
    pub available_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl AnimalDraft {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Animal name is required"));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(AppError::validation("Price must be greater than zero"));
        }
        Ok(())
    }
}
