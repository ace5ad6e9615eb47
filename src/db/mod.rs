pub mod connection;
pub mod replay;
pub mod results;
pub mod schema;
pub mod test_cases;

pub use connection::Database;
