//! Release scanner.
//!
//! Turns an input path into a list of [`Candidate`]s, one per release. A
//! folder is always one atomic release; only [`ScanMode::Recursive`] looks
//! inside the input path, and then only one level deep.

pub mod classifier;

use serde::Serialize;
use sp_core::{paths::has_extension, Category, Error, Result};
use sp_parser::{NormalizedName, Normalizer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::report::{SkipReason, SkippedItem};

pub use classifier::{classify, Payload};

/// How the input path is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// The path is one release: a file, or a folder taken as a whole.
    #[default]
    Single,
    /// The path is one folder release. A file path selects its parent folder.
    Folder,
    /// Every loose file and every immediate subfolder is its own release.
    Recursive,
}

/// One scanned item and its classification.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    /// Directory holding the item.
    pub root_folder: PathBuf,
    /// File or folder name inside `root_folder`.
    pub relative_item: String,
    pub is_folder: bool,

    pub category: Category,
    pub crew_tags: BTreeSet<String>,
    pub platform_tags: BTreeSet<String>,

    pub sanitized_name: String,
    pub guess_title: String,
    pub alternative_title: Option<String>,
    pub guess_season: Option<u32>,
    pub guess_episode: Option<u32>,
    pub episode_title: Option<String>,
    pub year: Option<u32>,
    pub source_tag: Option<String>,
    pub audio_codec_tag: Option<String>,
    pub subtitle_flag: bool,
    pub screen_size_tag: Option<String>,
}

impl Candidate {
    fn new(
        root_folder: PathBuf,
        relative_item: String,
        is_folder: bool,
        name: NormalizedName,
        payload: Payload,
    ) -> Self {
        let category = classify(&name, payload);
        let guess = name.guess;
        Self {
            root_folder,
            relative_item,
            is_folder,
            category,
            crew_tags: name.crew_tags.into_iter().collect(),
            platform_tags: name.platform_tags.into_iter().collect(),
            sanitized_name: name.sanitized,
            guess_title: name.title,
            alternative_title: guess.alternative_title,
            guess_season: guess.season,
            guess_episode: guess.episode,
            episode_title: guess.episode_title,
            year: guess.year,
            source_tag: guess.source,
            audio_codec_tag: guess.audio_codec,
            subtitle_flag: guess.subtitles,
            screen_size_tag: guess.screen_size,
        }
    }

    /// Full path of the scanned item.
    pub fn path(&self) -> PathBuf {
        self.root_folder.join(&self.relative_item)
    }

    pub fn is_episodic(&self) -> bool {
        self.guess_season.is_some() && self.guess_episode.is_some()
    }
}

/// Candidates in scan order, plus the items that were dropped on the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<SkippedItem>,
}

/// Scanner for release candidates.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
    normalizer: Normalizer,
}

impl Scanner {
    pub fn new(config: ScanConfig, normalizer: Normalizer) -> Self {
        Self { config, normalizer }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `path` according to `mode`.
    ///
    /// A missing input path is an error. Everything below it that cannot be
    /// turned into a candidate is reported in [`ScanOutcome::skipped`].
    pub fn scan(&self, path: &Path, mode: ScanMode) -> Result<ScanOutcome> {
        let meta = std::fs::metadata(path)?;
        let mut outcome = ScanOutcome::default();

        info!("Scanning {:?} ({:?})", path, mode);

        match mode {
            ScanMode::Single if meta.is_dir() => self.scan_folder(path, &mut outcome)?,
            ScanMode::Single => self.scan_file(path, &mut outcome)?,
            ScanMode::Folder => {
                if meta.is_dir() {
                    self.scan_folder(path, &mut outcome)?;
                } else {
                    let parent = match path.parent() {
                        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                        _ => std::fs::canonicalize(path)?
                            .parent()
                            .map(Path::to_path_buf)
                            .ok_or_else(|| {
                                Error::Validation(format!("{} has no parent folder", path.display()))
                            })?,
                    };
                    self.scan_folder(&parent, &mut outcome)?;
                }
            }
            ScanMode::Recursive if !meta.is_dir() => self.scan_file(path, &mut outcome)?,
            ScanMode::Recursive => {
                for entry in WalkDir::new(path)
                    .min_depth(1)
                    .max_depth(1)
                    .sort_by_file_name()
                {
                    let entry = entry.map_err(|e| Error::from(std::io::Error::from(e)))?;
                    if entry.file_type().is_dir() {
                        self.scan_folder(entry.path(), &mut outcome)?;
                    } else if entry.file_type().is_file() {
                        self.scan_file(entry.path(), &mut outcome)?;
                    }
                }
            }
        }

        info!(
            "Scan complete: {} candidate(s), {} skipped",
            outcome.candidates.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    fn scan_file(&self, path: &Path, outcome: &mut ScanOutcome) -> Result<()> {
        let (root, item) = split_path(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.clone());
        let name = self.normalizer.normalize(&stem);

        let payload = if has_extension(path, &self.config.document_extensions) {
            Payload::Document
        } else if has_extension(path, &self.config.video_extensions) {
            Payload::Video
        } else {
            Payload::Other
        };

        let is_game = !name.crew_tags.is_empty() || !name.platform_tags.is_empty();
        if payload == Payload::Other && !is_game {
            info!("Skipping {:?}: unsupported extension", path);
            outcome
                .skipped
                .push(SkippedItem::new(path, SkipReason::UnsupportedExtension));
            return Ok(());
        }

        let candidate = Candidate::new(root, item, false, name, payload);
        debug!(
            item = %candidate.relative_item,
            category = %candidate.category,
            title = %candidate.guess_title,
            "classified file"
        );
        outcome.candidates.push(candidate);
        Ok(())
    }

    fn scan_folder(&self, path: &Path, outcome: &mut ScanOutcome) -> Result<()> {
        let (root, item) = split_path(path)?;
        let name = self.normalizer.normalize(&item);

        let is_game = !name.crew_tags.is_empty() || !name.platform_tags.is_empty();
        let payload = if is_game {
            if release_files(path, Category::Game, &self.config).is_empty() {
                empty_folder(path, outcome);
                return Ok(());
            }
            Payload::Other
        } else if !release_files(path, Category::Movie, &self.config).is_empty() {
            Payload::Video
        } else if !release_files(path, Category::Document, &self.config).is_empty() {
            Payload::Document
        } else {
            empty_folder(path, outcome);
            return Ok(());
        };

        let candidate = Candidate::new(root, item, true, name, payload);
        debug!(
            item = %candidate.relative_item,
            category = %candidate.category,
            title = %candidate.guess_title,
            "classified folder"
        );
        outcome.candidates.push(candidate);
        Ok(())
    }
}

fn empty_folder(path: &Path, outcome: &mut ScanOutcome) {
    warn!(path = %path.display(), "empty folder, skipping");
    outcome
        .skipped
        .push(SkippedItem::new(path, SkipReason::EmptyFolder));
}

fn split_path(path: &Path) -> Result<(PathBuf, String)> {
    let item = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Validation(format!("{} has no file name", path.display())))?;
    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((root, item))
}

/// Files that belong to a folder release of `category`, sorted by path.
///
/// Games take every file; documents take the document allowlist; everything
/// else takes the video allowlist.
pub fn release_files(folder: &Path, category: Category, config: &ScanConfig) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| match category {
            Category::Game => true,
            Category::Document => has_extension(p, &config.document_extensions),
            Category::Movie | Category::TvShow => has_extension(p, &config.video_extensions),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sp_parser::NormalizerConfig;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> Scanner {
        Scanner::new(
            ScanConfig::default(),
            Normalizer::new(NormalizerConfig::default()).unwrap(),
        )
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Movie.Title.2020.1080p.WEB-DL.x264-GROUP.mkv");
        touch(&file);

        let out = scanner().scan(&file, ScanMode::Single).unwrap();
        assert_eq!(out.candidates.len(), 1);
        let c = &out.candidates[0];
        assert_eq!(c.category, Category::Movie);
        assert_eq!(c.guess_title, "Movie Title");
        assert_eq!(c.year, Some(2020));
        assert!(!c.is_folder);
        assert_eq!(c.path(), file);
    }

    #[test]
    fn single_unsupported_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        touch(&file);

        let out = scanner().scan(&file, ScanMode::Single).unwrap();
        assert!(out.candidates.is_empty());
        assert_matches!(out.skipped[0].reason, SkipReason::UnsupportedExtension);
    }

    #[test]
    fn season_folder_is_one_release() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("Show.Name.S02");
        for i in 1..=3 {
            touch(&folder.join(format!("Show.Name.S02E0{i}.mkv")));
        }

        let out = scanner().scan(&folder, ScanMode::Single).unwrap();
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].category, Category::TvShow);
        assert_eq!(out.candidates[0].guess_season, Some(2));
        assert!(out.candidates[0].is_folder);
    }

    #[test]
    fn folder_mode_uses_parent_of_file() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("Movie.Title.2020");
        let file = folder.join("movie.mkv");
        touch(&file);

        let out = scanner().scan(&file, ScanMode::Folder).unwrap();
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].relative_item, "Movie.Title.2020");
        assert!(out.candidates[0].is_folder);
    }

    #[test]
    fn recursive_is_sorted_and_one_level_deep() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.Movie.2019.mkv"));
        touch(&dir.path().join("a.Movie.2018.mp4"));
        touch(&dir.path().join("Show.S01/Show.S01E01.mkv"));
        touch(&dir.path().join("Show.S01/Extras/Show.S01.Extra.mkv"));
        touch(&dir.path().join("Game.Name.PS4-CODEX/data.bin"));

        let out = scanner().scan(dir.path(), ScanMode::Recursive).unwrap();
        let items: Vec<_> = out.candidates.iter().map(|c| c.relative_item.as_str()).collect();
        assert_eq!(
            items,
            vec!["Game.Name.PS4-CODEX", "Show.S01", "a.Movie.2018.mp4", "b.Movie.2019.mkv"]
        );
        assert_eq!(out.candidates[0].category, Category::Game);
        assert!(out.candidates[0].crew_tags.contains("CODEX"));
        assert!(out.candidates[0].platform_tags.contains("PS4"));
        assert_eq!(out.candidates[1].category, Category::TvShow);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn recursive_reports_loose_unsupported_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("Movie.2020.mkv"));
        touch(&dir.path().join("readme.txt"));

        let out = scanner().scan(dir.path(), ScanMode::Recursive).unwrap();
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.skipped.len(), 1);
        assert!(out.skipped[0].path.ends_with("readme.txt"));
        assert_matches!(out.skipped[0].reason, SkipReason::UnsupportedExtension);
    }

    #[test]
    fn empty_folder_is_skipped_and_scan_continues() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("Empty.Release/notes.nfo"));
        touch(&dir.path().join("Good.Movie.2021/good.mkv"));

        let out = scanner().scan(dir.path(), ScanMode::Recursive).unwrap();
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].relative_item, "Good.Movie.2021");
        assert_eq!(out.skipped.len(), 1);
        assert_matches!(out.skipped[0].reason, SkipReason::EmptyFolder);
    }

    #[test]
    fn documents() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("Some.Book.2020.epub"));
        touch(&dir.path().join("Papers/paper.pdf"));

        let out = scanner().scan(dir.path(), ScanMode::Recursive).unwrap();
        assert_eq!(out.candidates.len(), 2);
        assert!(out.candidates.iter().all(|c| c.category == Category::Document));
    }

    #[test]
    fn missing_path_is_io_error() {
        let err = scanner()
            .scan(Path::new("/nonexistent/release"), ScanMode::Single)
            .unwrap_err();
        assert_matches!(err, Error::Io { .. });
    }

    #[test]
    fn release_files_filters_by_category() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.mkv"));
        touch(&dir.path().join("b.nfo"));
        touch(&dir.path().join("sub/c.mp4"));

        let config = ScanConfig::default();
        assert_eq!(release_files(dir.path(), Category::Movie, &config).len(), 2);
        assert_eq!(release_files(dir.path(), Category::Game, &config).len(), 3);
        assert!(release_files(dir.path(), Category::Document, &config).is_empty());
    }
}
