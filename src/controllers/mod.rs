// Controller exports
pub mod chat;
pub mod search;

pub use chat::ChatSession;
pub use search::{SearchController, SearchDomain};
