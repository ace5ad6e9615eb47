pub mod protection;
pub mod singleton;

pub use protection::{ProtectionPolicy, DEFAULT_DENYLIST};
pub use singleton::{classify_query, classified_queries, has_singleton_operation, singleton_operations, ClassifiedQuery};
