//! Seam to the external face detection / embedding oracle.
//!
//! Detection and embedding extraction live outside this system (a model
//! runtime in production, a canned implementation in tests). The core only
//! consumes the bounding regions and vectors the oracle produces.

use thiserror::Error;

use crate::types::{BoundingBox, Embedding, Frame};

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("face oracle failed: {0}")]
    Inference(String),
}

/// One detected face: where it is, and its embedding.
#[derive(Debug, Clone)]
pub struct FaceObservation {
    pub location: BoundingBox,
    pub embedding: Embedding,
}

/// Face detection plus embedding extraction over a decoded frame.
///
/// Zero observations is a normal outcome (no face in the image), not an
/// error. Every observation carries one fixed-length embedding.
pub trait FaceOracle: Send + Sync {
    fn observe(&self, frame: &Frame) -> Result<Vec<FaceObservation>, OracleError>;
}
