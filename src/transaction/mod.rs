pub mod amount;
pub mod types;

pub use types::Transaction;
