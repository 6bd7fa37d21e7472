//! Backend fallback chain.

use std::path::Path;

use crate::prober::Prober;
use crate::types::MediaInfo;

/// Chains probe backends: the first one that decodes the file wins.
///
/// Backends that do not claim the file are skipped without being run. When
/// every claiming backend fails, the error lists each failure in order.
pub struct CompositeProber {
    chain: Vec<Box<dyn Prober>>,
}

impl CompositeProber {
    pub fn new(chain: Vec<Box<dyn Prober>>) -> Self {
        Self { chain }
    }
}

impl Prober for CompositeProber {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn supports(&self, path: &Path) -> bool {
        self.chain.iter().any(|backend| backend.supports(path))
    }

    fn probe(&self, path: &Path) -> sp_core::Result<MediaInfo> {
        let mut failures = Vec::new();

        for backend in self.chain.iter().filter(|b| b.supports(path)) {
            let err = match backend.probe(path) {
                Ok(info) => return Ok(info),
                Err(err) => err,
            };
            tracing::debug!(backend = backend.name(), error = %err, "backend gave up on file");
            failures.push(format!("{}: {}", backend.name(), err));
        }

        let detail = if failures.is_empty() {
            "no backend claims this file".to_string()
        } else {
            failures.join("; ")
        };
        Err(sp_core::Error::Probe(format!("{}: {}", path.display(), detail)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        height: Option<u32>,
        calls: Arc<AtomicUsize>,
    }

    impl Prober for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn supports(&self, path: &Path) -> bool {
            sp_core::paths::is_video_file(path)
        }

        fn probe(&self, path: &Path) -> sp_core::Result<MediaInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.height {
                Some(height) => Ok(MediaInfo {
                    file_path: path.to_path_buf(),
                    video_tracks: vec![crate::VideoTrack {
                        height,
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
                None => Err(sp_core::Error::Probe("broken".into())),
            }
        }
    }

    #[test]
    fn falls_back_to_next_prober() {
        let calls = Arc::new(AtomicUsize::new(0));
        let composite = CompositeProber::new(vec![
            Box::new(Fixed { height: None, calls: calls.clone() }),
            Box::new(Fixed { height: Some(720), calls: calls.clone() }),
        ]);
        let info = composite.probe(Path::new("a.mkv")).unwrap();
        assert_eq!(info.video_height(), Some(720));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn composite_supports_delegates() {
        let composite = CompositeProber::new(vec![Box::new(Fixed {
            height: Some(1080),
            calls: Arc::default(),
        })]);
        assert!(composite.supports(Path::new("movie.mkv")));
        assert!(!composite.supports(Path::new("book.pdf")));
    }

    #[test]
    fn empty_chain_reports_unclaimed_file() {
        let composite = CompositeProber::new(vec![]);
        let err = composite.probe(Path::new("movie.mkv")).unwrap_err();
        assert!(err.to_string().contains("no backend claims"));
    }

    #[test]
    fn all_failures_are_listed() {
        let composite = CompositeProber::new(vec![
            Box::new(Fixed { height: None, calls: Arc::default() }),
            Box::new(Fixed { height: None, calls: Arc::default() }),
        ]);
        let err = composite.probe(Path::new("a.mkv")).unwrap_err();
        assert_eq!(err.to_string().matches("fixed: ").count(), 2);
    }
}
