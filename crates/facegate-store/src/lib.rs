//! facegate-store — Encrypted at-rest gallery of identity records.
//!
//! One file per enrolled identity, AES-256-GCM over a JSON-encoded record.
//! The store owns the record directory and the in-memory gallery; matching
//! and enrollment go through its interface and never touch files directly.

pub mod codec;
pub mod crypto;
pub mod keys;
pub mod store;

pub use codec::CodecError;
pub use crypto::{CryptoBox, CryptoError};
pub use keys::{GalleryKey, PLACEHOLDER_KEY};
pub use store::{GalleryStore, LoadReport, StoreError};
