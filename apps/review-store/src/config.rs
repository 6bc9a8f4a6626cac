//! Runtime configuration.
//!
//! Values come from the environment, after loading a `.env` file if one is
//! present.

use review_core::{PracticeSettings, ValidationError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Which store backs the review service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Sqlite,
    Json,
}

impl StoreKind {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "sqlite" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub json_path: PathBuf,
    pub practice: PracticeSettings,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lingo-review")
}

impl AppConfig {
    /// Load `.env` then read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("REVIEW_STORE") {
            Some(value) => StoreKind::from_name(&value).ok_or(ConfigError::InvalidValue {
                key: "REVIEW_STORE",
                value,
            })?,
            None => StoreKind::Sqlite,
        };

        let db_path = lookup("REVIEW_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("reviews.db"));
        let json_path = lookup("REVIEW_JSON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("reviews.json"));

        let mut practice = PracticeSettings::default();
        if let Some(algorithm) = lookup("REVIEW_ALGORITHM") {
            review_core::require_algorithm(&algorithm)?;
            practice.algorithm = algorithm;
        }
        if let Some(value) = lookup("REVIEW_ACCEPT_THRESHOLD") {
            practice.acceptance_threshold = value
                .parse::<f64>()
                .ok()
                .filter(|t| (0.0..=100.0).contains(t))
                .ok_or(ConfigError::InvalidValue {
                    key: "REVIEW_ACCEPT_THRESHOLD",
                    value,
                })?;
        }

        Ok(Self {
            store,
            db_path,
            json_path,
            practice,
        })
    }
}
