use serde::{Deserialize, Serialize};
use sp_parser::NormalizerConfig;
use sp_probe::ProbeBackend;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub tags: NormalizerConfig,

    #[serde(default)]
    pub bundle: BundleConfig,

    #[serde(default)]
    pub duplicates: DuplicateConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Extensions that count as video files (case-insensitive, no dot)
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Extensions that force the document category
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,
}

fn default_video_extensions() -> Vec<String> {
    sp_core::paths::VIDEO_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_document_extensions() -> Vec<String> {
    sp_core::paths::DOCUMENT_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            document_extensions: default_document_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Tracker label copied into every bundle
    #[serde(default = "default_tracker_name")]
    pub tracker_name: String,

    /// Directory for .torrent files (default: next to the release)
    #[serde(default)]
    pub torrent_archive: Option<PathBuf>,

    /// ISO 639 code releases must carry, or "all"
    #[serde(default = "default_preferred_language")]
    pub preferred_language: String,
}

fn default_tracker_name() -> String {
    "local".to_string()
}

fn default_preferred_language() -> String {
    "all".to_string()
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            tracker_name: default_tracker_name(),
            torrent_archive: None,
            preferred_language: default_preferred_language(),
        }
    }
}

/// What to do when the catalog cannot be queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogErrorPolicy {
    /// Abort the batch.
    #[default]
    Fail,
    /// Log, mark the bundle as not checked, and carry on.
    Proceed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DuplicateConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Catalog snapshot (JSON) used when no --catalog is given
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// Entries whose size differs by more than this are not compared
    #[serde(default = "default_size_threshold")]
    pub size_threshold_percent: u32,

    /// Title similarity must be strictly above this to match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u32,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default)]
    pub on_catalog_error: CatalogErrorPolicy,
}

fn default_true() -> bool {
    true
}
fn default_size_threshold() -> u32 {
    5
}
fn default_similarity_threshold() -> u32 {
    95
}
fn default_page_size() -> usize {
    50
}
fn default_max_pages() -> usize {
    4
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot: None,
            size_threshold_percent: default_size_threshold(),
            similarity_threshold: default_similarity_threshold(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            on_catalog_error: CatalogErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Parallel bundle builders
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub backend: ProbeBackend,
}
