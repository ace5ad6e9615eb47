pub mod parse_tree;
pub mod event;
pub mod mutation;
pub mod test_case;
pub mod verdict;
pub mod oracle_result;
pub mod summary;

pub use parse_tree::*;
pub use event::*;
pub use mutation::*;
pub use test_case::*;
pub use verdict::*;
pub use oracle_result::*;
pub use summary::*;
