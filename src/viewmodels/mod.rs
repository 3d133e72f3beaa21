// ============================================================================
// VIEWMODELS - State + UI logic, one per dashboard area
// ============================================================================

pub mod admin_viewmodel;
pub mod auth_viewmodel;
pub mod cart_viewmodel;
pub mod catalog_viewmodel;
pub mod vendor_viewmodel;

pub use admin_viewmodel::AdminViewModel;
pub use auth_viewmodel::{Access, AuthViewModel};
pub use cart_viewmodel::CartViewModel;
pub use catalog_viewmodel::{CatalogViewModel, FeaturedRefresh};
pub use vendor_viewmodel::VendorViewModel;
