// Service exports
pub mod backend;
pub mod cache;
pub mod prefs;
pub mod store;

pub use backend::{BackendError, ChatBackend, HttpBackend, SearchBackend};
pub use cache::{scope_for, CacheKey, ResultCache};
pub use prefs::Preferences;
pub use store::{FileStore, MemoryStore, Store};
