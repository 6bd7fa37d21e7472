//! sp-core: shared types, errors, extension allowlists, and the resolution ladder.
//!
//! This crate is the foundational dependency for the other sp-* crates and the
//! `sceneprep` binary:
//!
//! - **Errors**: one [`Error`] enum plus a [`Result`] alias
//! - **Media types**: the closed [`Category`] set and [`ScanType`]
//! - **Path utilities**: video/document extension checks
//! - **Resolution ladder**: nearest-height bucketing of decoded video heights

pub mod error;
pub mod media;
pub mod paths;
pub mod resolution;

pub use error::{Error, Result};
pub use media::*;
pub use resolution::{ResolutionBucket, LADDER};
