//! facegate-core — Embedding types and identity matching.
//!
//! Faces enter the system as fixed-length embedding vectors produced by an
//! external detection/embedding oracle; this crate owns the vector types
//! and the gallery matching policy. It never touches disk or models.

pub mod matcher;
pub mod oracle;
pub mod types;

pub use matcher::{MatchError, MatchOutcome, Matcher, ScanOrderMatcher, UNKNOWN_NAME};
pub use oracle::{FaceObservation, FaceOracle, OracleError};
pub use types::{BoundingBox, Embedding, FaceRecord, Frame};
