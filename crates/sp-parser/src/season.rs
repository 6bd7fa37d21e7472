//! Season-pack detection.
//!
//! Evaluated on the name alone, independently of the title guesser: a name
//! is a season pack when it carries a season marker and no episode marker.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::sanitize;

static SEASON_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS\d{1,2}(?:E\d{1,3})*\b|\bSeason\s*\d{1,2}\b").expect("valid season regex")
});

static EPISODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS\d{1,2}E\d{1,3}|\bEp?\d{1,3}\b|\b\d{1,2}x\d{2,3}\b")
        .expect("valid episode regex")
});

static EPISODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:S\d{1,2}(?:E\d{1,3})+|\d{1,2}x\d{2,3})$").expect("valid episode token regex")
});

/// Whether a single whitespace-separated token is an `SxxEyy` or `NxNN` marker.
pub fn is_episode_marker(token: &str) -> bool {
    EPISODE_TOKEN.is_match(token)
}

/// Whether a file or folder name denotes a whole season.
///
/// # Examples
///
/// ```
/// use sp_parser::is_season_pack;
///
/// assert!(is_season_pack("Show.Name.S03.1080p"));
/// assert!(!is_season_pack("Show.Name.S03E07.1080p"));
/// assert!(!is_season_pack("Movie.2020.1080p"));
/// ```
pub fn is_season_pack(name: &str) -> bool {
    let name = sanitize(name);
    SEASON_MARKER.is_match(&name) && !EPISODE_MARKER.is_match(&name)
}
