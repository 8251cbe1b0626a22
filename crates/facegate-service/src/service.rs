//! The operations the transport layer consumes: recognize, register, status.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use facegate_core::{
    BoundingBox, FaceOracle, Frame, MatchError, Matcher, OracleError, ScanOrderMatcher,
    UNKNOWN_NAME,
};
use facegate_store::{CryptoBox, GalleryStore, LoadReport, StoreError};

use crate::config::{Config, ConfigError};
use crate::enrollment::{EnrollError, Enrollment};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Enroll(#[from] EnrollError),
}

/// Per-face recognition result; the location is passed through from the
/// oracle unmodified.
#[derive(Debug, Clone, Serialize)]
pub struct FaceResult {
    pub name: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    pub location: BoundingBox,
    /// Set when matching this face failed; the face degrades to Unknown
    /// instead of failing the whole request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Gallery introspection for the status operation.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryStatus {
    pub count: usize,
    pub names: Vec<String>,
}

/// The recognition service: one gallery, one oracle, one matcher.
pub struct FaceService {
    store: Arc<GalleryStore>,
    oracle: Arc<dyn FaceOracle>,
    enrollment: Enrollment,
    matcher: ScanOrderMatcher,
    threshold: f32,
}

impl FaceService {
    /// Resolve the key, open the gallery (the one load per process), and
    /// wire enrollment. Only key/configuration problems are fatal here;
    /// unreadable record files are skipped and reported.
    pub async fn bootstrap(
        config: &Config,
        oracle: Arc<dyn FaceOracle>,
    ) -> Result<(Self, LoadReport), ServiceError> {
        let key = config.resolve_key()?;
        let (store, report) =
            GalleryStore::open(&config.known_faces_dir, CryptoBox::new(&key)).await?;

        if report.nothing_readable() {
            tracing::error!(
                skipped = report.skipped,
                dir = %config.known_faces_dir.display(),
                "record files exist but none decrypted — ENCRYPTION_KEY is wrong or was regenerated"
            );
        }

        let store = Arc::new(store);
        Ok((
            Self {
                enrollment: Enrollment::new(store.clone()),
                store,
                oracle,
                matcher: ScanOrderMatcher,
                threshold: config.distance_threshold,
            },
            report,
        ))
    }

    /// Identify every face the oracle finds in the frame.
    ///
    /// A face whose matching fails (a stored embedding of the wrong
    /// length, say) yields an annotated Unknown entry; the rest of the
    /// batch is unaffected.
    pub async fn recognize(&self, frame: &Frame) -> Result<Vec<FaceResult>, ServiceError> {
        let observations = self.oracle.observe(frame)?;
        let gallery = self.store.snapshot().await;

        let results = observations
            .into_iter()
            .map(|obs| {
                match self
                    .matcher
                    .identify(&obs.embedding, &gallery, self.threshold)
                {
                    Ok(outcome) => FaceResult {
                        name: outcome.name,
                        confidence: outcome.confidence,
                        distance: outcome.distance,
                        location: obs.location,
                        error: None,
                    },
                    Err(err @ MatchError::DimensionMismatch { .. }) => {
                        tracing::warn!(error = %err, "face skipped during matching");
                        FaceResult {
                            name: UNKNOWN_NAME.to_string(),
                            confidence: 0.0,
                            distance: None,
                            location: obs.location,
                            error: Some(err.to_string()),
                        }
                    }
                }
            })
            .collect();
        Ok(results)
    }

    /// Enroll the first detected face under the given name.
    ///
    /// Returns `Ok(false)` when the oracle finds no face at all; the
    /// transport layer reports that as "no face detected".
    pub async fn register(&self, frame: &Frame, name: &str) -> Result<bool, ServiceError> {
        let mut observations = self.oracle.observe(frame)?;
        if observations.is_empty() {
            tracing::info!(name, "register: no face detected");
            return Ok(false);
        }

        let first = observations.remove(0);
        let id = self.enrollment.add(first.embedding, name).await?;
        tracing::info!(name, id = %id, "face registered");
        Ok(true)
    }

    /// Gallery introspection: record count and enrolled names.
    pub async fn status(&self) -> GalleryStatus {
        let names = self.store.names().await;
        GalleryStatus {
            count: names.len(),
            names,
        }
    }
}
