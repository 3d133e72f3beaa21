// ============================================================================
// API CLIENT - Typed endpoints of the marketplace API (stateless)
// ============================================================================
// No business logic: each call builds one request, sends it once, and maps
// the response to a model or an AppError.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{AppError, AppResult, AuthFailure};
use crate::models::animal::{Animal, AnimalDraft, AnimalPage, Breed, Category, FeaturedAnimals, VendorAnimals};
use crate::models::auth::{
    Credentials, LoginResponse, ProfileUpdate, Registration, User, UserEnvelope, UserPage, VendorPage,
};
use crate::models::cart::{
    AddItemRequest, AddItemResponse, CartItem, CartPage, CartPageResponse, CheckoutResponse, Order,
};
use crate::models::CatalogQuery;
use crate::services::http::{ApiRequest, ApiResponse, HttpTransport};
use crate::utils::{LOGIN_FALLBACK_ERROR, NETWORK_FALLBACK_ERROR};

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send once. Non-2xx becomes `Transport` with the server's message
    /// (or `fallback`); a 401 on an authenticated call becomes `Auth`.
    async fn execute(&self, request: ApiRequest, fallback: &str) -> AppResult<ApiResponse> {
        let authenticated = request.bearer.is_some();
        let label = request.describe();
        let response = self.transport.send(request).await.map_err(|e| match e {
            AppError::Transport { status: None, .. } => {
                AppError::transport(None, NETWORK_FALLBACK_ERROR)
            }
            other => other,
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .server_message()
            .unwrap_or_else(|| fallback.to_string());
        log::warn!("⚠️ {} -> HTTP {}: {}", label, response.status, message);

        if response.status == 401 && authenticated {
            return Err(AppError::Auth(AuthFailure::Rejected(message)));
        }
        Err(AppError::transport(Some(response.status), message))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest, fallback: &str) -> AppResult<T> {
        self.execute(request, fallback).await?.json()
    }

    fn require(token: Option<&str>) -> AppResult<&str> {
        token
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Auth(AuthFailure::MissingToken))
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        log::info!("🔐 Logging in {}", credentials.email);
        let request = ApiRequest::post("/login").json(json!({
            "email": credentials.email,
            "password": credentials.password,
        }));
        self.fetch_json(request, LOGIN_FALLBACK_ERROR).await
    }

    /// Self sign-up sends no bearer; an admin creating another admin does.
    pub async fn register(&self, registration: &Registration, bearer: Option<&str>) -> AppResult<()> {
        let body = serde_json::to_value(registration)
            .map_err(|e| AppError::validation(format!("Invalid registration: {}", e)))?;
        let request = ApiRequest::post("/register").json(body).bearer(bearer);
        self.execute(request, "Registration failed").await?;
        Ok(())
    }

    pub async fn current_user(&self, bearer: Option<&str>) -> AppResult<User> {
        let token = Self::require(bearer)?;
        let request = ApiRequest::get("/current-user").bearer(Some(token));
        let resp: UserEnvelope = self
            .fetch_json(request, "Failed to fetch user details")
            .await?;
        Ok(resp.user)
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
        bearer: Option<&str>,
    ) -> AppResult<User> {
        let token = Self::require(bearer)?;
        let body = serde_json::to_value(update).map_err(|e| AppError::validation(e.to_string()))?;
        let request = ApiRequest::patch(format!("/users/{}", user_id))
            .json(body)
            .bearer(Some(token));
        let resp: UserEnvelope = self
            .fetch_json(request, "Failed to update user details")
            .await?;
        Ok(resp.user)
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    pub async fn cart_page(
        &self,
        owner_id: &str,
        page: u32,
        per_page: u32,
        bearer: Option<&str>,
    ) -> AppResult<CartPage> {
        let request = ApiRequest::get(format!("/cart/{}/items", owner_id))
            .query("page", page)
            .query("per_page", per_page)
            .bearer(bearer);
        let raw: CartPageResponse = self.fetch_json(request, "Failed to fetch cart").await?;
        raw.into_page()
    }

    pub async fn add_cart_item(
        &self,
        owner_id: &str,
        animal_id: &str,
        quantity: u32,
        bearer: Option<&str>,
    ) -> AppResult<CartItem> {
        let body = serde_json::to_value(AddItemRequest::new(animal_id, quantity))
            .map_err(|e| AppError::validation(e.to_string()))?;
        let request = ApiRequest::post(format!("/cart/{}/items", owner_id))
            .json(body)
            .bearer(bearer);
        let resp: AddItemResponse = self
            .fetch_json(request, "Failed to add item to cart")
            .await?;
        resp.cart_item
            .ok_or_else(|| AppError::data_shape("response has no cart_item"))
    }

    pub async fn remove_cart_item(
        &self,
        owner_id: &str,
        animal_id: &str,
        bearer: Option<&str>,
    ) -> AppResult<()> {
        let request = ApiRequest::delete(format!("/cart/{}/items/{}", owner_id, animal_id))
            .bearer(bearer);
        self.execute(request, "Failed to remove item from cart")
            .await?;
        Ok(())
    }

    pub async fn checkout(&self, owner_id: &str, bearer: Option<&str>) -> AppResult<Order> {
        let request = ApiRequest::post(format!("/cart/{}/checkout", owner_id)).bearer(bearer);
        let resp: CheckoutResponse = self.fetch_json(request, "Failed to checkout").await?;
        resp.order
            .ok_or_else(|| AppError::data_shape("response has no order"))
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub async fn browse_animals(&self, query: &CatalogQuery, page: u32, per_page: u32) -> AppResult<AnimalPage> {
        let path = if query.uses_search() {
            "/animals/search"
        } else {
            "/animals/filter"
        };
        let request = ApiRequest::get(path).queries(query.params(page, per_page));
        self.fetch_json(request, "Failed to fetch animals").await
    }

    pub async fn animal(&self, animal_id: &str) -> AppResult<Animal> {
        let request = ApiRequest::get(format!("/animals/{}", animal_id));
        self.fetch_json(request, "Failed to load animal details").await
    }

    pub async fn featured_animals(&self) -> AppResult<Vec<Animal>> {
        let resp: FeaturedAnimals = self
            .fetch_json(ApiRequest::get("/animals/featured"), "Failed to fetch featured animals.")
            .await?;
        Ok(resp.featured_animals)
    }

    pub async fn similar_animals(&self, vendor_id: i64) -> AppResult<Vec<Animal>> {
        let request = ApiRequest::get("/animals/similar").query("vendor_id", vendor_id);
        let value: serde_json::Value = self
            .fetch_json(request, "Failed to fetch similar animals")
            .await?;
        // Served either as a bare array or wrapped in `animals`
        let list = value.get("animals").cloned().unwrap_or(value);
        serde_json::from_value(list).map_err(|e| AppError::data_shape(e.to_string()))
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.fetch_json(ApiRequest::get("/categories"), "Failed to fetch categories")
            .await
    }

    pub async fn breeds(&self) -> AppResult<Vec<Breed>> {
        self.fetch_json(ApiRequest::get("/breeds"), "Failed to fetch breeds")
            .await
    }

    // ------------------------------------------------------------------
    // Vendor listings (bearer required)
    // ------------------------------------------------------------------

    pub async fn vendor_animals(&self, bearer: Option<&str>) -> AppResult<Vec<Animal>> {
        let token = Self::require(bearer)?;
        let request = ApiRequest::get("/vendor/animals/list").bearer(Some(token));
        let resp: VendorAnimals = self
            .fetch_json(request, "Failed to fetch vendor animals")
            .await?;
        Ok(resp.animals)
    }

    pub async fn create_animal(&self, draft: &AnimalDraft, bearer: Option<&str>) -> AppResult<Animal> {
        let token = Self::require(bearer)?;
        let body = serde_json::to_value(draft).map_err(|e| AppError::validation(e.to_string()))?;
        let request = ApiRequest::post("/vendor/animals").json(body).bearer(Some(token));
        let value: serde_json::Value = self.fetch_json(request, "Failed to create animal").await?;
        unwrap_animal(value)
    }

    pub async fn update_animal(
        &self,
        animal_id: &str,
        draft: &AnimalDraft,
        bearer: Option<&str>,
    ) -> AppResult<Animal> {
        let token = Self::require(bearer)?;
        let body = serde_json::to_value(draft).map_err(|e| AppError::validation(e.to_string()))?;
        let request = ApiRequest::patch(format!("/vendor/animals/{}", animal_id))
            .json(body)
            .bearer(Some(token));
        let value: serde_json::Value = self.fetch_json(request, "Failed to update animal").await?;
        unwrap_animal(value)
    }

    pub async fn delete_animal(&self, animal_id: &str, bearer: Option<&str>) -> AppResult<()> {
        if animal_id.trim().is_empty() {
            return Err(AppError::validation("Animal ID is required for deletion"));
        }
        let token = Self::require(bearer)?;
        let request = ApiRequest::delete(format!("/vendor/animals/delete/{}", animal_id))
            .bearer(Some(token));
        self.execute(request, "Failed to delete animal").await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users (admin, bearer required)
    // ------------------------------------------------------------------

    pub async fn users(&self, page: u32, per_page: u32, bearer: Option<&str>) -> AppResult<UserPage> {
        let token = Self::require(bearer)?;
        let request = ApiRequest::get("/users")
            .query("page", page)
            .query("per_page", per_page)
            .bearer(Some(token));
        self.fetch_json(request, "Failed to fetch users").await
    }

    pub async fn delete_user(&self, user_id: i64, bearer: Option<&str>) -> AppResult<()> {
        let token = Self::require(bearer)?;
        let request = ApiRequest::delete(format!("/users/{}", user_id)).bearer(Some(token));
        self.execute(request, "Failed to delete user").await?;
        Ok(())
    }

    /// Vendor directory. Public; the token is forwarded when there is one.
    pub async fn vendors(&self, page: u32, per_page: u32, bearer: Option<&str>) -> AppResult<VendorPage> {
        let request = ApiRequest::get("/vendors")
            .query("page", page)
            .query("per_page", per_page)
            .bearer(bearer);
        self.fetch_json(request, "Failed to fetch vendors.").await
    }
}

/// Create/update answer with the animal itself or `{ "animal": … }`.
fn unwrap_animal(value: serde_json::Value) -> AppResult<Animal> {
    let inner = value.get("animal").cloned().unwrap_or(value);
    serde_json::from_value(inner).map_err(|e| AppError::data_shape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockTransport;
    use futures::executor::block_on;

    fn client(mock: &MockTransport) -> ApiClient {
        ApiClient::new(Rc::new(mock.clone()))
    }

    #[test]
    fn test_non_2xx_uses_server_error_verbatim() {
        let mock = MockTransport::new();
        mock.respond(401, json!({ "error": "Wrong password" }));

        let err = block_on(client(&mock).login(&Credentials {
            email: "a@b.ke".into(),
            password: "x".into(),
        }))
        .unwrap_err();
        assert_eq!(err, AppError::transport(Some(401), "Wrong password"));
    }

    #[test]
    fn test_non_2xx_without_message_uses_fallback() {
        let mock = MockTransport::new();
        mock.respond_raw(500, "Internal Server Error");

        let err = block_on(client(&mock).checkout("4", None)).unwrap_err();
        assert_eq!(err, AppError::transport(Some(500), "Failed to checkout"));
    }

    #[test]
    fn test_network_failure_is_generic_and_retryable() {
        let mock = MockTransport::new();
        mock.fail_network();

        let err = block_on(client(&mock).categories()).unwrap_err();
        assert_eq!(err.user_message(), NETWORK_FALLBACK_ERROR);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_vendor_calls_fail_locally_without_token() {
        let mock = MockTransport::new();
        let api = client(&mock);

        let err = block_on(api.vendor_animals(None)).unwrap_err();
        assert_eq!(err, AppError::Auth(AuthFailure::MissingToken));
        let err = block_on(api.delete_user(3, Some(""))).unwrap_err();
        assert_eq!(err, AppError::Auth(AuthFailure::MissingToken));
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_401_with_bearer_is_auth_error() {
        let mock = MockTransport::new();
        mock.respond(401, json!({ "message": "Token has expired" }));

        let err = block_on(client(&mock).vendor_animals(Some("tok"))).unwrap_err();
        assert_eq!(
            err,
            AppError::Auth(AuthFailure::Rejected("Token has expired".into()))
        );
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_browse_picks_endpoint_from_query() {
        let mock = MockTransport::new();
        mock.respond(200, json!({ "animals": [], "pagination": { "total_pages": 1 } }));
        mock.respond(200, json!({ "animals": [], "pagination": { "total_pages": 1 } }));
        let api = client(&mock);

        let search = CatalogQuery {
            breed: Some("Boran".into()),
            ..Default::default()
        };
        block_on(api.browse_animals(&search, 1, 9)).unwrap();
        block_on(api.browse_animals(&CatalogQuery::default(), 1, 9)).unwrap();

        let paths: Vec<String> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/animals/search", "/animals/filter"]);
    }

    #[test]
    fn test_add_item_missing_cart_item_is_data_shape() {
        let mock = MockTransport::new();
        mock.respond(201, json!({ "status": "success" }));

        let err = block_on(client(&mock).add_cart_item("4", "7", 1, None)).unwrap_err();
        assert!(matches!(err, AppError::DataShape(_)));
    }

    #[test]
    fn test_register_forwards_optional_bearer() {
        let mock = MockTransport::new();
        mock.respond(201, json!({ "message": "User registered" }));
        mock.respond(201, json!({ "message": "User registered" }));
        let api = client(&mock);
        let registration = Registration {
            name: "Njeri".into(),
            email: "njeri@farm.ke".into(),
            password: "s3cret".into(),
            role: crate::models::Role::Customer,
        };

        block_on(api.register(&registration, None)).unwrap();
        block_on(api.register(&registration, Some("admin-tok"))).unwrap();
        let bearers: Vec<_> = mock.requests().into_iter().map(|r| r.bearer).collect();
        assert_eq!(bearers, vec![None, Some("admin-tok".to_string())]);
    }

    #[test]
    fn test_profile_endpoints_unwrap_user() {
        let mock = MockTransport::new();
        let user = json!({ "user": { "id": 4, "name": "Amina", "email": "amina@farm.ke", "role": "customer" } });
        mock.respond(200, user.clone());
        mock.respond(200, user);
        let api = client(&mock);

        assert_eq!(block_on(api.current_user(Some("tok"))).unwrap().id, 4);
        let update = ProfileUpdate {
            name: "Amina".into(),
            email: "amina@farm.ke".into(),
            ..Default::default()
        };
        block_on(api.update_user(4, &update, Some("tok"))).unwrap();

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.method, crate::services::Method::Patch);
        assert_eq!(sent.path, "/users/4");
        assert_eq!(mock.requests()[0].path, "/current-user");

        let err = block_on(api.current_user(None)).unwrap_err();
        assert_eq!(err, AppError::Auth(AuthFailure::MissingToken));
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_similar_accepts_bare_or_wrapped_list() {
        let mock = MockTransport::new();
        mock.respond(200, json!([{ "id": 1, "name": "Kid goat", "price": 4000 }]));
        mock.respond(200, json!({ "animals": [{ "id": 2, "name": "Ewe", "price": 7000 }] }));
        let api = client(&mock);

        assert_eq!(block_on(api.similar_animals(5)).unwrap()[0].id, "1");
        assert_eq!(block_on(api.similar_animals(5)).unwrap()[0].id, "2");
    }
}
