// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::path::PathBuf;

/// Minutes in a day; `DAY_OFFSET_MINUTES` must stay strictly inside ±this.
const MINUTES_PER_DAY: i32 = 24 * 60;

/// Where records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Cloud Firestore (or the emulator when FIRESTORE_EMULATOR_HOST is set)
    Firestore,
    /// Process-local maps, lost on restart. Local development and tests.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub storage_backend: StorageBackend,
    /// Optional JSON file overriding the built-in achievement/badge catalog
    pub catalog_path: Option<PathBuf>,
    /// Offset applied before truncating a timestamp to its calendar day
    pub day_offset: FixedOffset,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            storage_backend: StorageBackend::Memory,
            catalog_path: None,
            day_offset: Utc.fix(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Firestore,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            storage_backend,
            catalog_path: env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            day_offset: parse_day_offset(env::var("DAY_OFFSET_MINUTES").ok().as_deref())?,
        })
    }
}

/// Parse `DAY_OFFSET_MINUTES` (e.g. `480` for UTC+8). Unset means UTC.
fn parse_day_offset(raw: Option<&str>) -> Result<FixedOffset, ConfigError> {
    let minutes: i32 = match raw {
        None => 0,
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("DAY_OFFSET_MINUTES", s.to_string()))?,
    };

    if !(-(MINUTES_PER_DAY - 1)..MINUTES_PER_DAY).contains(&minutes) {
        return Err(ConfigError::Invalid(
            "DAY_OFFSET_MINUTES",
            minutes.to_string(),
        ));
    }

    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| ConfigError::Invalid("DAY_OFFSET_MINUTES", minutes.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STORAGE_BACKEND", "memory");
        env::set_var("DAY_OFFSET_MINUTES", "480");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.day_offset.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_parse_day_offset() {
        assert_eq!(parse_day_offset(None).unwrap().local_minus_utc(), 0);
        assert_eq!(
            parse_day_offset(Some("-300")).unwrap().local_minus_utc(),
            -300 * 60
        );
        assert!(parse_day_offset(Some("1440")).is_err());
        assert!(parse_day_offset(Some("eight")).is_err());
    }

    #[test]
    fn test_parse_day_offset_bounds() {
        assert!(parse_day_offset(Some("1439")).is_ok());
        assert!(parse_day_offset(Some("-1439")).is_ok());
        assert!(parse_day_offset(Some("-1440")).is_err());
        assert!(matches!(
            parse_day_offset(Some("-2147483648")),
            Err(ConfigError::Invalid("DAY_OFFSET_MINUTES", _))
        ));
        assert!(parse_day_offset(Some("2147483647")).is_err());
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StorageBackend>().unwrap(),
            StorageBackend::Firestore
        );
        assert_eq!(
            " memory ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
