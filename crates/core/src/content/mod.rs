//! Page content: built-in defaults and the in-process content cache.

pub mod cache;
pub mod defaults;

pub use cache::{CacheConfig, ContentCache, ContentDocument, ContentInvalidation, ContentSource};
pub use defaults::default_document;
