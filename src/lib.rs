pub mod analyzer;
pub mod anomaly;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod source;
pub mod transaction;
