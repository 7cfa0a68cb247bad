// Core algorithm exports
pub mod adapter;
pub mod normalizer;
pub mod validate;

pub use adapter::{adapt_candidates, adapt_conversation, adapt_listings};
pub use normalizer::normalize;
pub use validate::{filter_rules, first_message};
