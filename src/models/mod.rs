pub mod animal;
pub mod auth;
pub mod cart;
pub mod ids;
pub mod pagination;
pub mod route;

pub use animal::{
    Animal, AnimalDraft, AnimalPage, Breed, CatalogQuery, Category, FeaturedAnimals, VendorAnimals,
};
pub use auth::{
    Credentials, LoginResponse, PageMeta, ProfileUpdate, Registration, Role, User, UserEnvelope,
    UserPage, Vendor, VendorPage,
};
pub use cart::{CartId, CartItem, CartPage, Order};
pub use pagination::PageCursor;
pub use route::Route;
