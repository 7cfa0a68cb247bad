// Model exports
pub mod criteria;
pub mod domain;
pub mod state;

pub use criteria::FilterCriteria;
pub use domain::{CacheEntry, ChatMessage, CityOption, Entity, EntityKind};
pub use state::{ChatState, ChatStatus, SearchState, SearchStatus};
