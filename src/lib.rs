//! Sceneprep - release classification and duplicate detection
//!
//! This library crate exposes the pipeline stages for the binary and for
//! integration testing.

pub mod batch;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod dupes;
pub mod pipeline;
pub mod report;
pub mod scanner;
