//! Metadata bundle construction.
//!
//! A [`MetadataBundle`] is the immutable record handed to the duplicate
//! detector and, after that, to whatever packages and uploads the release.
//! It merges what the scanner inferred from the name with filesystem facts
//! (sizes, manifest) and what the prober decoded from the first video file.

pub mod language;

use serde::Serialize;
use sp_core::{paths::has_extension, Category, ResolutionBucket};
use sp_parser::{is_episode_marker, is_season_pack, sanitize};
use sp_probe::{MediaInfo, Prober};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{BundleConfig, ScanConfig};
use crate::report::SkipReason;
use crate::scanner::{release_files, Candidate};

/// One file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub length: u64,
    /// Path relative to the release folder, or the file name for single files.
    pub relative_path: PathBuf,
}

/// Everything downstream stages need to know about one release.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataBundle {
    pub file_name: String,
    pub folder: PathBuf,
    pub path: PathBuf,
    pub canonical_name: String,
    pub alternative_title: Option<String>,
    /// Sanitized release name without the episode title.
    pub display_name: String,
    pub size_bytes: u64,
    pub manifest: Vec<ManifestEntry>,
    pub category: Category,
    pub tracker_name: String,
    pub is_season_pack: bool,
    pub torrent_path: PathBuf,
    pub document_description: Option<String>,
    /// ISO 639-2/B codes, or [`language::NOT_FOUND`]. Never empty.
    pub audio_languages: Vec<String>,
    pub resolution: ResolutionBucket,
    pub game_title: Option<String>,
    pub game_crew_tags: Vec<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub year: Option<u32>,
}

impl MetadataBundle {
    pub fn is_episodic(&self) -> bool {
        self.season.is_some() && self.episode.is_some()
    }

    pub fn size_gb(&self) -> f64 {
        bytes_to_gb(self.size_bytes)
    }
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

/// Builds [`MetadataBundle`]s from scanner candidates.
#[derive(Clone)]
pub struct BundleBuilder {
    config: BundleConfig,
    scan: ScanConfig,
    prober: Arc<dyn Prober>,
}

impl BundleBuilder {
    pub fn new(config: BundleConfig, scan: ScanConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            config,
            scan,
            prober,
        }
    }

    /// Build the bundle for one candidate.
    ///
    /// Returns [`SkipReason::NoManifest`] when the candidate no longer has
    /// any eligible file on disk.
    pub fn build(&self, candidate: &Candidate) -> Result<MetadataBundle, SkipReason> {
        self.build_until(candidate, &CancellationToken::new())
    }

    /// [`BundleBuilder::build`] that gives up with [`SkipReason::Aborted`]
    /// when `cancel` fires before the media probe starts.
    pub fn build_until(
        &self,
        candidate: &Candidate,
        cancel: &CancellationToken,
    ) -> Result<MetadataBundle, SkipReason> {
        let path = candidate.path();
        let manifest = self.manifest(candidate, &path);
        if manifest.is_empty() {
            warn!(path = %path.display(), "no eligible files, skipping");
            return Err(SkipReason::NoManifest);
        }
        let size_bytes = manifest.iter().map(|e| e.length).sum();

        if cancel.is_cancelled() {
            debug!(path = %path.display(), "cancelled before probing");
            return Err(SkipReason::Aborted);
        }

        let base_name = if candidate.is_folder {
            candidate.relative_item.as_str()
        } else {
            Path::new(&candidate.relative_item)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&candidate.relative_item)
        };
        let display_name = display_name(base_name, candidate.episode_title.as_deref());

        let media = match candidate.category {
            Category::Movie | Category::TvShow => self.probe_first_video(&path, &manifest),
            Category::Game | Category::Document => None,
        };

        let resolution = media
            .as_ref()
            .map_or(ResolutionBucket::Other, MediaInfo::resolution);
        if resolution.is_other() && media.is_some() {
            warn!(path = %path.display(), "no video height decoded, resolution set to other");
        }

        let audio_languages = self.audio_languages(&display_name, media.as_ref());

        let archive = self
            .config
            .torrent_archive
            .clone()
            .unwrap_or_else(|| candidate.root_folder.clone());
        let torrent_path = archive.join(format!("{}.torrent", candidate.relative_item));

        let is_game = candidate.category == Category::Game;
        let bundle = MetadataBundle {
            file_name: candidate.relative_item.clone(),
            folder: candidate.root_folder.clone(),
            path: path.clone(),
            canonical_name: candidate.guess_title.clone(),
            alternative_title: candidate.alternative_title.clone(),
            display_name,
            size_bytes,
            manifest,
            category: candidate.category,
            tracker_name: self.config.tracker_name.clone(),
            is_season_pack: is_season_pack(&candidate.relative_item),
            torrent_path,
            document_description: (candidate.category == Category::Document)
                .then(|| candidate.guess_title.clone()),
            audio_languages,
            resolution,
            game_title: is_game.then(|| candidate.guess_title.clone()),
            game_crew_tags: if is_game {
                candidate.crew_tags.iter().cloned().collect()
            } else {
                Vec::new()
            },
            season: candidate.guess_season,
            episode: candidate.guess_episode,
            year: candidate.year,
        };

        debug!(
            name = %bundle.canonical_name,
            size = bundle.size_bytes,
            resolution = %bundle.resolution,
            languages = ?bundle.audio_languages,
            "built bundle"
        );
        Ok(bundle)
    }

    fn manifest(&self, candidate: &Candidate, path: &Path) -> Vec<ManifestEntry> {
        if !candidate.is_folder {
            return match std::fs::metadata(path) {
                Ok(meta) => vec![ManifestEntry {
                    length: meta.len(),
                    relative_path: PathBuf::from(&candidate.relative_item),
                }],
                Err(e) => {
                    warn!("Failed to stat {:?}: {}", path, e);
                    Vec::new()
                }
            };
        }

        release_files(path, candidate.category, &self.scan)
            .into_iter()
            .filter_map(|file| {
                let length = match std::fs::metadata(&file) {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        warn!("Failed to stat {:?}: {}", file, e);
                        return None;
                    }
                };
                let relative_path = file.strip_prefix(path).unwrap_or(&file).to_path_buf();
                Some(ManifestEntry {
                    length,
                    relative_path,
                })
            })
            .collect()
    }

    fn probe_first_video(&self, path: &Path, manifest: &[ManifestEntry]) -> Option<MediaInfo> {
        let entry = manifest
            .iter()
            .find(|e| has_extension(&e.relative_path, &self.scan.video_extensions))?;
        let file = if path.is_dir() {
            path.join(&entry.relative_path)
        } else {
            path.to_path_buf()
        };

        match self.prober.probe(&file) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(
                    file = %file.display(),
                    prober = self.prober.name(),
                    error = %e,
                    "probe failed, resolution set to other"
                );
                None
            }
        }
    }

    fn audio_languages(&self, display_name: &str, media: Option<&MediaInfo>) -> Vec<String> {
        let from_name = language::languages_in_name(display_name);
        if !from_name.is_empty() {
            return from_name;
        }

        if let Some(info) = media {
            let from_container = language::normalize_container_languages(&info.audio_languages());
            if !from_container.is_empty() {
                return from_container;
            }
        }

        debug!(name = %display_name, "no audio language found");
        vec![language::NOT_FOUND.to_string()]
    }
}

/// Sanitize a release name and drop the episode title from it.
///
/// The episode title is removed only where it directly follows the episode
/// marker, and only as whole tokens. Anywhere else the name is left as is.
pub fn display_name(base_name: &str, episode_title: Option<&str>) -> String {
    let sanitized = sanitize(base_name);
    let Some(episode_title) = episode_title.map(sanitize).filter(|t| !t.is_empty()) else {
        return sanitized;
    };

    let tokens: Vec<&str> = sanitized.split_whitespace().collect();
    let title: Vec<&str> = episode_title.split_whitespace().collect();
    let Some(marker) = tokens.iter().position(|t| is_episode_marker(t)) else {
        return sanitized;
    };

    let start = marker + 1;
    let end = start + title.len();
    let follows_marker = tokens
        .get(start..end)
        .is_some_and(|run| run.iter().zip(&title).all(|(a, b)| a.eq_ignore_ascii_case(b)));
    if !follows_marker {
        return sanitized;
    }

    tokens[..start]
        .iter()
        .chain(&tokens[end..])
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
