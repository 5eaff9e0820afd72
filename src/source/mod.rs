pub mod file;

pub use file::{load_transactions, parse_json_snapshot};
