use std::path::PathBuf;

use thiserror::Error;

use facegate_core::matcher::DEFAULT_THRESHOLD;
use facegate_store::{GalleryKey, PLACEHOLDER_KEY};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ENCRYPTION_KEY is not configured and key generation is disabled")]
    KeyMissing,
}

/// Service configuration, loaded from environment variables.
pub struct Config {
    /// Directory of encrypted identity records (created if absent).
    pub known_faces_dir: PathBuf,
    /// Operator-supplied encryption secret; None when unset, empty, or
    /// still the sample placeholder.
    pub encryption_key: Option<String>,
    /// Maximum Euclidean distance for a candidate match.
    pub distance_threshold: f32,
    /// Whether a missing key may be auto-generated at startup.
    pub generate_missing_key: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let encryption_key = std::env::var("ENCRYPTION_KEY")
            .ok()
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY);

        Self {
            known_faces_dir: std::env::var("KNOWN_FACES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/known_faces")),
            encryption_key,
            distance_threshold: env_f32("DISTANCE_THRESHOLD", DEFAULT_THRESHOLD),
            generate_missing_key: std::env::var("ENCRYPTION_KEY_AUTOGENERATE")
                .map(|v| v != "0")
                .unwrap_or(true),
        }
    }

    /// Resolve the gallery key, generating one if permitted.
    ///
    /// A generated key is an operational hazard: every record written
    /// under it is orphaned on restart unless the operator persists the
    /// printed value, so the generation is logged at `warn` with the value
    /// to persist.
    pub fn resolve_key(&self) -> Result<GalleryKey, ConfigError> {
        match &self.encryption_key {
            Some(secret) => Ok(GalleryKey::from_secret(secret)),
            None if self.generate_missing_key => {
                let (key, hex) = GalleryKey::generate();
                tracing::warn!(
                    encryption_key = %hex,
                    "no ENCRYPTION_KEY configured; generated a fresh key — \
                     persist this value or records written now are unreadable after restart"
                );
                Ok(key)
            }
            None => Err(ConfigError::KeyMissing),
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
