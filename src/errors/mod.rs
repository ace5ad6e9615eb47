pub mod types;
pub mod classification;

pub use types::OracleError;
pub use classification::{ErrorClassification, ErrorScope};
