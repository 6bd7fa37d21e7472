//! What to do with a release that has plausible duplicates.

use serde::Serialize;

use crate::bundle::MetadataBundle;
use crate::dupes::DuplicateReport;

/// The caller's answer for a release with duplicate matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Keep the release anyway.
    Proceed,
    /// Drop this release, continue with the rest.
    #[default]
    Skip,
    /// Stop the whole run.
    Abort,
}

/// Decides the fate of releases the duplicate detector flagged.
///
/// Only called when the report has at least one match.
pub trait DuplicateResolver: Send + Sync {
    fn resolve(&self, bundle: &MetadataBundle, report: &DuplicateReport) -> Decision;
}

/// Gives the same answer for every release.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyResolver(pub Decision);

impl DuplicateResolver for PolicyResolver {
    fn resolve(&self, bundle: &MetadataBundle, report: &DuplicateReport) -> Decision {
        tracing::info!(
            name = %bundle.canonical_name,
            matches = report.matches.len(),
            decision = ?self.0,
            "duplicate policy applied"
        );
        self.0
    }
}
