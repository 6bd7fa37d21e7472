//! # sp-probe
//!
//! Media probing for sceneprep.
//!
//! Only what the bundle builder needs is decoded: video height, scan type
//! (with a secondary interlaced flag), and audio track languages. Two
//! backends shell out to external tools:
//!
//! - [`FfprobeProber`]: `ffprobe -print_format json`
//! - [`MediaInfoProber`]: `mediainfo --Output=JSON`
//!
//! [`CompositeProber`] tries them in order.
//!
//! ## Quick start
//!
//! ```no_run
//! use sp_probe::{build_prober, ProbeBackend, Prober};
//! use std::path::Path;
//!
//! let prober = build_prober(ProbeBackend::Auto);
//! let info = prober.probe(Path::new("movie.mkv")).unwrap();
//! if let Some(v) = info.primary_video() {
//!     println!("{}x{} {:?}", v.width, v.height, v.scan_type);
//! }
//! ```

pub mod composite;
pub mod ffprobe;
pub mod mediainfo;
pub mod prober;
pub mod tools;
pub mod types;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use composite::CompositeProber;
pub use ffprobe::FfprobeProber;
pub use mediainfo::MediaInfoProber;
pub use prober::Prober;
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
pub use types::{AudioTrack, MediaInfo, VideoTrack};

/// Which probe backend(s) to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeBackend {
    /// ffprobe first, mediainfo as fallback.
    #[default]
    Auto,
    Ffprobe,
    Mediainfo,
}

impl ProbeBackend {
    /// External tools the backend can run, in the order they are tried.
    pub fn tools(self) -> &'static [&'static str] {
        match self {
            ProbeBackend::Auto => &["ffprobe", "mediainfo"],
            ProbeBackend::Ffprobe => &["ffprobe"],
            ProbeBackend::Mediainfo => &["mediainfo"],
        }
    }
}

/// Make sure at least one tool of `backend` is installed.
///
/// Returns the name and path of the first tool found, or the
/// [`sp_core::Error::Tool`] of the last one tried.
pub fn require_backend(backend: ProbeBackend) -> sp_core::Result<(&'static str, PathBuf)> {
    let mut last_err = None;
    for &tool in backend.tools() {
        match require_tool(tool) {
            Ok(path) => return Ok((tool, path)),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| sp_core::Error::tool("probe", "backend has no tools")))
}

/// Build the prober for a configured backend.
pub fn build_prober(backend: ProbeBackend) -> Box<dyn Prober> {
    match backend {
        ProbeBackend::Auto => Box::new(CompositeProber::new(vec![
            Box::new(FfprobeProber::new()),
            Box::new(MediaInfoProber::new()),
        ])),
        ProbeBackend::Ffprobe => Box::new(FfprobeProber::new()),
        ProbeBackend::Mediainfo => Box::new(MediaInfoProber::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!(build_prober(ProbeBackend::Auto).name(), "composite");
        assert_eq!(build_prober(ProbeBackend::Ffprobe).name(), "ffprobe");
        assert_eq!(build_prober(ProbeBackend::Mediainfo).name(), "mediainfo");
    }

    #[test]
    fn auto_backend_tries_both_tools() {
        assert_eq!(ProbeBackend::Auto.tools(), &["ffprobe", "mediainfo"]);
        assert_eq!(ProbeBackend::Mediainfo.tools(), &["mediainfo"]);
    }
}
