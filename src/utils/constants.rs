/// localStorage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// localStorage key holding the serialized user
pub const USER_KEY: &str = "user";

/// sessionStorage key holding the active cart id
pub const CART_ID_KEY: &str = "cartId";

/// Prefix of client-generated cart ids (`cart-<owner>`)
pub const CART_ID_PREFIX: &str = "cart";

pub const LOGIN_FALLBACK_ERROR: &str = "Invalid credentials";
pub const NETWORK_FALLBACK_ERROR: &str = "An error occurred. Please try again.";
pub const UNKNOWN_ROLE_ERROR: &str = "Unknown user role";
