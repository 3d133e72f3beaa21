use crate::models::auth::Role;

/// Views the router can navigate to
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Route {
    Landing,
    Login,
    Unauthorized,
    CustomerDashboard,
    VendorDashboard,
    AdminDashboard,
    Animals,
    AnimalDetails(String),
    Cart(Option<String>),
    Users,
    OrderConfirmation(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Unauthorized => "/unauthorized".to_string(),
            Route::CustomerDashboard => "/customer/dashboard".to_string(),
            Route::VendorDashboard => "/vendor/dashboard".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::Animals => "/animals".to_string(),
            Route::AnimalDetails(id) => format!("/animal/{}", id),
            Route::Cart(None) => "/cart".to_string(),
            Route::Cart(Some(cart_id)) => format!("/cart/{}", cart_id),
            Route::Users => "/users".to_string(),
            Route::OrderConfirmation(order_id) => format!("/order-confirmation/{}", order_id),
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["unauthorized"] => Route::Unauthorized,
            ["customer", "dashboard"] => Route::CustomerDashboard,
            ["vendor", "dashboard"] => Route::VendorDashboard,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["animals"] => Route::Animals,
            ["animal", id] => Route::AnimalDetails(id.to_string()),
            ["cart"] => Route::Cart(None),
            ["cart", id] => Route::Cart(Some(id.to_string())),
            ["users"] => Route::Users,
            ["order-confirmation", id] => Route::OrderConfirmation(id.to_string()),
            _ => return None,
        };
        Some(route)
    }

    /// Roles allowed to open the view. `None` means public.
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Landing | Route::Login | Route::Unauthorized => None,
            Route::VendorDashboard => Some(&[Role::Vendor]),
            Route::CustomerDashboard | Route::Cart(_) | Route::OrderConfirmation(_) => {
                Some(&[Role::Customer])
            }
            Route::AdminDashboard | Route::Users => Some(&[Role::Admin]),
            Route::Animals | Route::AnimalDetails(_) => Some(&[Role::Vendor, Role::Customer]),
        }
    }

    /// Landing view after login
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Customer => Route::CustomerDashboard,
            Role::Vendor => Route::VendorDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_roundtrip() {
        let routes = [
            Route::Landing,
            Route::Login,
            Route::VendorDashboard,
            Route::AnimalDetails("12".into()),
            Route::Cart(Some("cart-4".into())),
            Route::OrderConfirmation("99".into()),
        ];
        for route in routes {
            assert_eq!(Route::from_path(&route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/cart?page=2"), Some(Route::Cart(None)));
        assert_eq!(Route::from_path("/nowhere/at/all"), None);
    }

    #[test]
    fn test_home_for_each_role() {
        assert_eq!(Route::home_for(Role::Customer), Route::CustomerDashboard);
        assert_eq!(Route::home_for(Role::Vendor), Route::VendorDashboard);
        assert_eq!(Route::home_for(Role::Admin), Route::AdminDashboard);
    }

    #[test]
    fn test_public_routes_have_no_roles() {
        assert!(Route::Login.required_roles().is_none());
        assert_eq!(Route::Users.required_roles(), Some(&[Role::Admin][..]));
    }
}
