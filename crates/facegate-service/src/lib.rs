//! facegate-service — The recognition/enrollment facade.
//!
//! Exposes the three operations the transport layer calls — `recognize`,
//! `register`, `status` — over a gallery loaded once at process start.
//! Routes, JSON shaping, and CORS belong to the transport, not here.

pub mod config;
pub mod enrollment;
pub mod service;

pub use config::{Config, ConfigError};
pub use enrollment::{EnrollError, Enrollment};
pub use service::{FaceResult, FaceService, GalleryStatus, ServiceError};
