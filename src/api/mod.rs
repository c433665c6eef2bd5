pub mod dashboard;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;
