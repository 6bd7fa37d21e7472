//! Run outcome types: accepted releases, skipped items, summary.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::bundle::MetadataBundle;
use crate::dupes::DuplicateReport;

/// Why an item did not make it into the accepted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A single file whose extension is in neither allowlist.
    UnsupportedExtension,
    /// A folder with no file matching any allowlist.
    EmptyFolder,
    /// The bundle builder found nothing to put in the manifest.
    NoManifest,
    /// None of the release's audio languages is the preferred one.
    LanguageFiltered { preferred: String, found: Vec<String> },
    /// The duplicate check failed for this item alone.
    CheckFailed { message: String },
    /// The duplicate resolver chose to skip.
    DuplicateSkipped { matches: usize },
    /// The run was aborted before this item was decided.
    Aborted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension => write!(f, "unsupported file extension"),
            SkipReason::EmptyFolder => write!(f, "folder contains no eligible files"),
            SkipReason::NoManifest => write!(f, "no files to include in the manifest"),
            SkipReason::LanguageFiltered { preferred, found } => write!(
                f,
                "preferred language '{}' not among [{}]",
                preferred,
                found.join(", ")
            ),
            SkipReason::CheckFailed { message } => {
                write!(f, "duplicate check failed: {}", message)
            }
            SkipReason::DuplicateSkipped { matches } => {
                write!(f, "skipped after {} possible duplicate(s)", matches)
            }
            SkipReason::Aborted => write!(f, "run aborted before this item"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedItem {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

impl fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// A bundle that passed every stage, with the duplicate evidence it was accepted with.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedRelease {
    pub bundle: MetadataBundle,
    pub duplicates: DuplicateReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub candidates: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub with_duplicates: usize,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub accepted: Vec<AcceptedRelease>,
    pub skipped: Vec<SkippedItem>,
    /// Set when the duplicate resolver asked to stop the run.
    pub aborted: bool,
    pub summary: RunSummary,
}

impl RunReport {
    pub(crate) fn finish(mut self, candidates: usize) -> Self {
        self.summary = RunSummary {
            candidates,
            accepted: self.accepted.len(),
            skipped: self.skipped.len(),
            with_duplicates: self
                .accepted
                .iter()
                .filter(|a| a.duplicates.has_matches())
                .count(),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_human_readable() {
        let item = SkippedItem::new("/media/Empty", SkipReason::EmptyFolder);
        assert_eq!(item.to_string(), "/media/Empty: folder contains no eligible files");

        let lang = SkipReason::LanguageFiltered {
            preferred: "ita".into(),
            found: vec!["eng".into(), "fre".into()],
        };
        assert_eq!(lang.to_string(), "preferred language 'ita' not among [eng, fre]");
    }

    #[test]
    fn reason_serializes_with_kind_tag() {
        let json = serde_json::to_value(SkipReason::DuplicateSkipped { matches: 2 }).unwrap();
        assert_eq!(json["kind"], "duplicate_skipped");
        assert_eq!(json["matches"], 2);
    }
}
