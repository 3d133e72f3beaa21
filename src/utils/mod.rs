// Shared utilities

pub mod constants;
pub mod jwt;
pub mod storage;

pub use constants::*;
pub use storage::{load_json, save_json, BrowserStorage, KeyValueStore, MemoryStorage};
