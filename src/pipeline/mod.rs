//! End-to-end run: scan, build bundles, filter, check duplicates, decide.

pub mod resolver;

use sp_core::{Category, Error, Result};
use sp_parser::Normalizer;
use sp_probe::Prober;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::batch::run_pool;
use crate::bundle::{language, BundleBuilder, MetadataBundle};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::dupes::DuplicateDetector;
use crate::report::{AcceptedRelease, RunReport, SkipReason, SkippedItem};
use crate::scanner::{ScanMode, Scanner};

pub use resolver::{Decision, DuplicateResolver, PolicyResolver};

pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    builder: BundleBuilder,
    detector: DuplicateDetector,
    catalog: Option<Arc<dyn Catalog>>,
    resolver: Box<dyn DuplicateResolver>,
}

impl Pipeline {
    /// Wire every stage from one configuration.
    ///
    /// Fails only when the configured tag dictionaries cannot be compiled.
    pub fn new(
        config: Config,
        prober: Arc<dyn Prober>,
        catalog: Option<Arc<dyn Catalog>>,
        resolver: Box<dyn DuplicateResolver>,
    ) -> Result<Self> {
        let normalizer = Normalizer::new(config.tags.clone())?;
        let scanner = Scanner::new(config.scan.clone(), normalizer.clone());
        let builder = BundleBuilder::new(config.bundle.clone(), config.scan.clone(), prober);
        let detector = DuplicateDetector::new(config.duplicates.clone(), normalizer);

        Ok(Self {
            config,
            scanner,
            builder,
            detector,
            catalog,
            resolver,
        })
    }

    /// Process everything under `path`.
    ///
    /// Per-item problems end up in [`RunReport::skipped`]. The run fails as a
    /// whole only on a batch-fatal error: the catalog is unavailable under the
    /// `fail` policy, or `cancel` fires.
    pub async fn run(
        &self,
        path: &Path,
        mode: ScanMode,
        cancel: CancellationToken,
    ) -> Result<RunReport> {
        let scanner = self.scanner.clone();
        let scan_path = path.to_path_buf();
        let outcome = tokio::task::spawn_blocking(move || scanner.scan(&scan_path, mode))
            .await
            .map_err(|e| Error::Internal(format!("scan task failed: {e}")))??;

        let mut report = RunReport {
            skipped: outcome.skipped,
            ..Default::default()
        };
        let candidate_count = outcome.candidates.len();
        let paths: Vec<PathBuf> = outcome.candidates.iter().map(|c| c.path()).collect();

        let builder = self.builder.clone();
        let built = run_pool(
            outcome.candidates,
            self.config.batch.workers,
            cancel.clone(),
            move |candidate, cancel| builder.build_until(&candidate, cancel),
        )
        .await?;

        let mut pending = paths.into_iter().zip(built);
        while let Some((item_path, result)) = pending.next() {
            if cancel.is_cancelled() {
                return Err(Error::Interrupted(format!(
                    "cancelled after {} accepted release(s)",
                    report.accepted.len()
                )));
            }

            let bundle = match result {
                Ok(bundle) => bundle,
                Err(reason) => {
                    skip(&mut report, item_path, reason);
                    continue;
                }
            };

            if let Some(reason) = self.language_mismatch(&bundle) {
                skip(&mut report, item_path, reason);
                continue;
            }

            let detector = self.detector.clone();
            let catalog = self.catalog.clone();
            let checked = bundle.clone();
            let checked =
                tokio::task::spawn_blocking(move || detector.check(&checked, catalog.as_deref()))
                    .await
                    .unwrap_or_else(|e| Err(Error::Internal(format!("check task failed: {e}"))));
            let duplicates = match checked {
                Ok(duplicates) => duplicates,
                Err(e) if e.is_batch_fatal() => return Err(e),
                Err(e) => {
                    warn!(path = %item_path.display(), error = %e, "duplicate check failed");
                    skip(&mut report, item_path, SkipReason::CheckFailed { message: e.to_string() });
                    continue;
                }
            };

            if !duplicates.has_matches() {
                report.accepted.push(AcceptedRelease { bundle, duplicates });
                continue;
            }

            match self.resolver.resolve(&bundle, &duplicates) {
                Decision::Proceed => report.accepted.push(AcceptedRelease { bundle, duplicates }),
                Decision::Skip => skip(
                    &mut report,
                    item_path,
                    SkipReason::DuplicateSkipped {
                        matches: duplicates.matches.len(),
                    },
                ),
                Decision::Abort => {
                    info!("Run aborted at {:?}", item_path);
                    report.aborted = true;
                    skip(&mut report, item_path, SkipReason::Aborted);
                    for (rest, _) in pending.by_ref() {
                        report.skipped.push(SkippedItem::new(rest, SkipReason::Aborted));
                    }
                    break;
                }
            }
        }

        let report = report.finish(candidate_count);
        info!(
            accepted = report.summary.accepted,
            skipped = report.summary.skipped,
            with_duplicates = report.summary.with_duplicates,
            "run complete"
        );
        Ok(report)
    }

    fn language_mismatch(&self, bundle: &MetadataBundle) -> Option<SkipReason> {
        let preferred = &self.config.bundle.preferred_language;
        if !matches!(bundle.category, Category::Movie | Category::TvShow)
            || language::matches_preference(&bundle.audio_languages, preferred)
        {
            return None;
        }
        Some(SkipReason::LanguageFiltered {
            preferred: preferred.clone(),
            found: bundle.audio_languages.clone(),
        })
    }
}

fn skip(report: &mut RunReport, path: PathBuf, reason: SkipReason) {
    info!("Skipping {:?}: {}", path, reason);
    report.skipped.push(SkippedItem::new(path, reason));
}
