//! Host side of the review core: durable stores, the review service and
//! its configuration.

pub mod config;
pub mod db;
pub mod journal;
pub mod json_store;
pub mod logging;
pub mod service;

pub use config::{AppConfig, ConfigError, StoreKind};
pub use db::{DbError, SqliteStore};
pub use journal::{RecordReviews, ReviewLogEntry};
pub use json_store::JsonFileStore;
pub use service::{AnswerReport, ReviewOutcome, ReviewService, ReviewStats, ServiceError};
