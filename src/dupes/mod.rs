//! Duplicate detection against the catalog.
//!
//! For every catalog entry of a compatible category:
//!
//! 1. Reject on size first. An entry without a size, or whose size differs
//!    from the bundle's by more than `size_threshold_percent`, is not compared.
//! 2. Normalize the entry name with the same [`Normalizer`] the scanner uses
//!    and score title similarity.
//! 3. When both sides are episodic, season and episode must be equal.
//!
//! Every match is collected. The detector never decides what happens to the
//! release; that is the caller's [`DuplicateResolver`](crate::pipeline::DuplicateResolver).

pub mod similarity;

use serde::Serialize;
use sp_core::{Error, Result};
use sp_parser::Normalizer;
use tracing::{debug, info, warn};

use crate::bundle::MetadataBundle;
use crate::catalog::{Catalog, CatalogEntry, CatalogQuery};
use crate::config::{CatalogErrorPolicy, DuplicateConfig};

pub use similarity::{size_delta_percent, title_similarity};

/// Evidence for one catalog entry that was compared against the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateMatch {
    pub existing_entry_id: String,
    pub entry_name: String,
    pub title_similarity: u32,
    pub size_delta_percent: u32,
    pub same_season_episode: bool,
    pub is_match: bool,
}

/// Whether and how the catalog was consulted for a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Checked,
    /// The category is never duplicate-checked (documents).
    Exempt,
    Disabled,
    NoCatalog,
    /// The catalog failed and the policy said to carry on.
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub status: CheckStatus,
    /// Entries that passed the category and size checks.
    pub compared: usize,
    pub size_rejected: usize,
    pub matches: Vec<DuplicateMatch>,
}

impl DuplicateReport {
    fn unchecked(status: CheckStatus) -> Self {
        Self {
            status,
            compared: 0,
            size_rejected: 0,
            matches: Vec::new(),
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Outcome of comparing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Different category.
    Incompatible,
    /// Missing size or size delta over the threshold.
    SizeRejected,
    Compared(DuplicateMatch),
}

#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    config: DuplicateConfig,
    normalizer: Normalizer,
}

impl DuplicateDetector {
    pub fn new(config: DuplicateConfig, normalizer: Normalizer) -> Self {
        Self { config, normalizer }
    }

    /// Query the catalog for `bundle` and collect every plausible duplicate.
    ///
    /// A catalog failure is returned as [`Error::Catalog`] unless
    /// `on_catalog_error` is `proceed`, in which case the report says
    /// [`CheckStatus::Unavailable`].
    pub fn check(
        &self,
        bundle: &MetadataBundle,
        catalog: Option<&dyn Catalog>,
    ) -> Result<DuplicateReport> {
        if !self.config.enabled {
            return Ok(DuplicateReport::unchecked(CheckStatus::Disabled));
        }
        if !bundle.category.is_dupe_checked() {
            return Ok(DuplicateReport::unchecked(CheckStatus::Exempt));
        }
        let Some(catalog) = catalog else {
            return Ok(DuplicateReport::unchecked(CheckStatus::NoCatalog));
        };

        let mut report = DuplicateReport::unchecked(CheckStatus::Checked);

        for page in 0..self.config.max_pages {
            let query = CatalogQuery {
                name: bundle.canonical_name.clone(),
                page,
                page_size: self.config.page_size,
            };

            let results = match catalog.search(&query) {
                Ok(results) => results,
                Err(e) => return self.catalog_failed(bundle, e),
            };

            for entry in &results.entries {
                match self.compare(bundle, entry) {
                    Comparison::Incompatible => {}
                    Comparison::SizeRejected => report.size_rejected += 1,
                    Comparison::Compared(m) => {
                        report.compared += 1;
                        if m.is_match {
                            report.matches.push(m);
                        }
                    }
                }
            }

            if !results.has_more {
                break;
            }
        }

        if report.has_matches() {
            info!(
                name = %bundle.canonical_name,
                matches = report.matches.len(),
                "possible duplicates found"
            );
        }
        Ok(report)
    }

    fn catalog_failed(&self, bundle: &MetadataBundle, error: Error) -> Result<DuplicateReport> {
        let error = match error {
            Error::Catalog(_) => error,
            other => Error::catalog(other.to_string()),
        };
        match self.config.on_catalog_error {
            CatalogErrorPolicy::Fail => Err(error),
            CatalogErrorPolicy::Proceed => {
                warn!(
                    name = %bundle.canonical_name,
                    error = %error,
                    "catalog unavailable, duplicate check skipped"
                );
                Ok(DuplicateReport::unchecked(CheckStatus::Unavailable))
            }
        }
    }

    /// Compare one catalog entry against the bundle.
    pub fn compare(&self, bundle: &MetadataBundle, entry: &CatalogEntry) -> Comparison {
        if let Some(category) = entry.category {
            if category != bundle.category || !category.is_dupe_checked() {
                return Comparison::Incompatible;
            }
        }

        let Some(entry_size) = entry.size_bytes else {
            debug!(entry = %entry.name, "catalog entry has no size, not compared");
            return Comparison::SizeRejected;
        };
        let size_delta = size_delta_percent(bundle.size_bytes, entry_size);
        if size_delta > self.config.size_threshold_percent {
            debug!(entry = %entry.name, size_delta, "size differs too much");
            return Comparison::SizeRejected;
        }

        let existing = self.normalizer.normalize(&entry.name);
        let similarity = title_similarity(&bundle.canonical_name, &existing.title);

        let episodic = bundle.is_episodic() && existing.is_episodic();
        let same_season_episode = episodic
            && bundle.season == existing.guess.season
            && bundle.episode == existing.guess.episode;

        let is_match = size_delta <= self.config.size_threshold_percent
            && similarity > self.config.similarity_threshold
            && (!episodic || same_season_episode);

        debug!(
            entry = %entry.name,
            similarity,
            size_delta,
            episodic,
            is_match,
            "compared catalog entry"
        );

        Comparison::Compared(DuplicateMatch {
            existing_entry_id: entry.id.clone(),
            entry_name: entry.name.clone(),
            title_similarity: similarity,
            size_delta_percent: size_delta,
            same_season_episode,
            is_match,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogPage, SnapshotCatalog};
    use assert_matches::assert_matches;
    use sp_core::{Category, ResolutionBucket};
    use sp_parser::NormalizerConfig;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GB: f64 = 1024.0 * 1024.0 * 1024.0;

    fn detector(config: DuplicateConfig) -> DuplicateDetector {
        DuplicateDetector::new(config, Normalizer::new(NormalizerConfig::default()).unwrap())
    }

    fn bundle(name: &str, category: Category, size_gb: f64) -> MetadataBundle {
        MetadataBundle {
            file_name: name.to_string(),
            folder: PathBuf::from("/media"),
            path: PathBuf::from("/media").join(name),
            canonical_name: name.to_string(),
            alternative_title: None,
            display_name: name.to_string(),
            size_bytes: (size_gb * GB) as u64,
            manifest: Vec::new(),
            category,
            tracker_name: "local".into(),
            is_season_pack: false,
            torrent_path: PathBuf::from("/media/x.torrent"),
            document_description: None,
            audio_languages: vec!["eng".into()],
            resolution: ResolutionBucket::Other,
            game_title: None,
            game_crew_tags: Vec::new(),
            season: None,
            episode: None,
            year: None,
        }
    }

    fn entry(
        id: &str,
        name: &str,
        category: Option<Category>,
        size_gb: Option<f64>,
    ) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
            category,
            size_bytes: size_gb.map(|g| (g * GB) as u64),
            resolution: None,
            info_hash: None,
        }
    }

    #[test]
    fn close_size_and_title_is_match() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Movie Title", Category::Movie, 4.1);
        let e = entry("1", "Movie Title 2020", Some(Category::Movie), Some(4.0));

        let m = assert_matches!(d.compare(&b, &e), Comparison::Compared(m) => m);
        assert_eq!(m.size_delta_percent, 2);
        assert!(m.title_similarity > 95);
        assert!(m.is_match);
    }

    #[test]
    fn size_rejected_before_title() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Movie Title", Category::Movie, 10.0);
        let e = entry("1", "Movie Title 2020", Some(Category::Movie), Some(4.0));
        assert_eq!(d.compare(&b, &e), Comparison::SizeRejected);
    }

    #[test]
    fn missing_size_is_rejected() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let e = entry("1", "Movie Title", Some(Category::Movie), None);
        assert_eq!(d.compare(&b, &e), Comparison::SizeRejected);
    }

    #[test]
    fn other_category_is_incompatible() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let e = entry("1", "Movie Title", Some(Category::TvShow), Some(4.0));
        assert_eq!(d.compare(&b, &e), Comparison::Incompatible);

        let unknown = entry("2", "Movie Title", None, Some(4.0));
        assert_matches!(d.compare(&b, &unknown), Comparison::Compared(_));
    }

    #[test]
    fn episodic_requires_same_episode() {
        let d = detector(DuplicateConfig::default());
        let mut b = bundle("Show Name", Category::TvShow, 1.0);
        b.season = Some(1);
        b.episode = Some(2);

        let same = entry("1", "Show.Name.S01E02.720p.HDTV", Some(Category::TvShow), Some(1.0));
        let other = entry("2", "Show.Name.S01E03.720p.HDTV", Some(Category::TvShow), Some(1.0));

        let m = assert_matches!(d.compare(&b, &same), Comparison::Compared(m) => m);
        assert!(m.same_season_episode);
        assert!(m.is_match);

        let m = assert_matches!(d.compare(&b, &other), Comparison::Compared(m) => m);
        assert!(!m.same_season_episode);
        assert_eq!(m.title_similarity, 100);
        assert!(!m.is_match);
    }

    #[test]
    fn similarity_must_exceed_threshold() {
        let d = detector(DuplicateConfig {
            similarity_threshold: 100,
            ..Default::default()
        });
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let e = entry("1", "Movie Title", Some(Category::Movie), Some(4.0));
        let m = assert_matches!(d.compare(&b, &e), Comparison::Compared(m) => m);
        assert_eq!(m.title_similarity, 100);
        assert!(!m.is_match);
    }

    #[test]
    fn check_collects_every_match() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let catalog = SnapshotCatalog::from_entries(vec![
            entry("1", "Movie Title 2020 1080p", Some(Category::Movie), Some(4.0)),
            entry("2", "Movie Title 2020 720p", Some(Category::Movie), Some(4.1)),
            entry("3", "Movie Title 2020 2160p", Some(Category::Movie), Some(20.0)),
            entry("4", "Movie Title Returns", Some(Category::Movie), Some(4.0)),
        ]);

        let report = d.check(&b, Some(&catalog)).unwrap();
        assert_eq!(report.status, CheckStatus::Checked);
        let ids: Vec<_> = report.matches.iter().map(|m| m.existing_entry_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(report.size_rejected, 1);
        assert_eq!(report.compared, 3);
    }

    #[test]
    fn documents_are_exempt() {
        let d = detector(DuplicateConfig::default());
        let b = bundle("Some Book", Category::Document, 0.01);
        let catalog = SnapshotCatalog::from_entries(vec![entry("1", "Some Book", None, Some(0.01))]);
        let report = d.check(&b, Some(&catalog)).unwrap();
        assert_eq!(report.status, CheckStatus::Exempt);
        assert!(!report.has_matches());
    }

    #[test]
    fn disabled_and_missing_catalog() {
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let off = detector(DuplicateConfig {
            enabled: false,
            ..Default::default()
        });
        assert_eq!(off.check(&b, None).unwrap().status, CheckStatus::Disabled);

        let on = detector(DuplicateConfig::default());
        assert_eq!(on.check(&b, None).unwrap().status, CheckStatus::NoCatalog);
    }

    struct Broken;

    impl Catalog for Broken {
        fn search(&self, _query: &CatalogQuery) -> Result<CatalogPage> {
            Err(Error::Io {
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "down"),
            })
        }
    }

    #[test]
    fn unavailable_catalog_fails_by_default() {
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let err = detector(DuplicateConfig::default())
            .check(&b, Some(&Broken))
            .unwrap_err();
        assert_matches!(err, Error::Catalog(_));
        assert!(err.is_batch_fatal());
    }

    #[test]
    fn unavailable_catalog_can_proceed() {
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let d = detector(DuplicateConfig {
            on_catalog_error: CatalogErrorPolicy::Proceed,
            ..Default::default()
        });
        let report = d.check(&b, Some(&Broken)).unwrap();
        assert_eq!(report.status, CheckStatus::Unavailable);
        assert!(!report.has_matches());
    }

    struct Paged {
        calls: AtomicUsize,
    }

    impl Catalog for Paged {
        fn search(&self, query: &CatalogQuery) -> Result<CatalogPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CatalogPage {
                entries: vec![entry(
                    &query.page.to_string(),
                    "Movie Title",
                    Some(Category::Movie),
                    Some(4.0),
                )],
                has_more: true,
            })
        }
    }

    #[test]
    fn paging_stops_at_max_pages() {
        let d = detector(DuplicateConfig {
            max_pages: 3,
            ..Default::default()
        });
        let b = bundle("Movie Title", Category::Movie, 4.0);
        let catalog = Paged {
            calls: AtomicUsize::new(0),
        };
        let report = d.check(&b, Some(&catalog)).unwrap();
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.matches.len(), 3);
    }
}
