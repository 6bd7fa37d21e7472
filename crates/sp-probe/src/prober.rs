//! The [`Prober`] trait: the media-probe collaborator of the bundle builder.

use std::path::Path;

use crate::types::MediaInfo;

/// Decodes the few stream facts a release bundle needs from one file.
///
/// Shared between bundle workers, hence `Send + Sync`.
pub trait Prober: Send + Sync {
    /// Backend name used in logs (`"ffprobe"`, `"mediainfo"`, ...).
    fn name(&self) -> &'static str;

    /// Decode `path`.
    fn probe(&self, path: &Path) -> sp_core::Result<MediaInfo>;

    /// Cheap pre-check, usually by extension. `true` is no promise that
    /// [`Prober::probe`] succeeds.
    fn supports(&self, path: &Path) -> bool;
}
