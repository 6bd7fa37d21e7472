//! Path utilities for detecting file types by extension.
//!
//! The default allowlists live here; the scanner may be configured with its
//! own lists, which go through [`has_extension`].

use std::path::Path;

/// Default video container extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "ts", "m2ts", "m4v", "webm", "wmv", "flv", "mpg",
];

/// Default document extensions. Checked independently of the video list.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "epub"];

/// Check if a path's extension is in `allowed` (case-insensitive).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sp_core::paths::has_extension;
///
/// assert!(has_extension(Path::new("a.ISO"), &["iso"]));
/// assert!(!has_extension(Path::new("a"), &["iso"]));
/// ```
pub fn has_extension<S: AsRef<str>>(path: &Path, allowed: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Check if a path has a default video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sp_core::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/disc.M2TS")));
/// assert!(!is_video_file(Path::new("manual.pdf")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check if a path has a default document file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sp_core::paths::is_document_file;
///
/// assert!(is_document_file(Path::new("book.epub")));
/// assert!(!is_document_file(Path::new("movie.mkv")));
/// ```
pub fn is_document_file(path: &Path) -> bool {
    has_extension(path, DOCUMENT_EXTENSIONS)
}
