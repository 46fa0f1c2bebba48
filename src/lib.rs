pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use error::{ComparisonError, Result};
pub use service::{aggregate, aggregate_batch, ComparisonService};
pub use store::{InMemoryRequestStore, RequestStore};
