//! Enrollment: validate an embedding and bind it to a name in the gallery.

use std::sync::Arc;

use thiserror::Error;

use facegate_core::{Embedding, FaceRecord};
use facegate_store::{GalleryStore, StoreError};

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("enrollment requires a non-empty name")]
    EmptyName,
    #[error("embedding is degenerate (empty or non-finite values)")]
    InvalidEmbedding,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Adds new identities to the gallery.
///
/// Matching-independent by design: enrolling an already-known person again
/// is legal and simply adds another record.
pub struct Enrollment {
    store: Arc<GalleryStore>,
}

impl Enrollment {
    pub fn new(store: Arc<GalleryStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new identity record; returns its assigned id.
    /// Nothing is written when validation fails.
    pub async fn add(&self, embedding: Embedding, name: &str) -> Result<String, EnrollError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EnrollError::EmptyName);
        }
        if !embedding.is_well_formed() {
            return Err(EnrollError::InvalidEmbedding);
        }

        let record = FaceRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            embedding,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        Ok(self.store.append(record).await?)
    }
}
