#![forbid(unsafe_code)]
//! greenlight-core library.
//!
//! Data model for ad groups and their child assets/recipes, the injected
//! document-store seam, review-version normalization, and the shared error
//! taxonomy.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums with machine-readable
//!   [`error::ErrorCode`]s; `anyhow::Result` only at config-load seams.
//! - **Logging**: `tracing` macros (`warn!`, `debug!`); no subscriber is
//!   installed by this crate.

pub mod config;
pub mod error;
pub mod model;
pub mod review_version;
pub mod store;

pub use error::{ErrorCode, StoreError};
pub use review_version::ReviewVersion;
