//! Output types for the title guesser and the normalizer.

use serde::{Deserialize, Serialize};

/// Free-text fields recovered from a sanitized release name.
///
/// Every field is best-effort. A guesser that cannot find a title leaves
/// both `title` and `primary_title` empty and the normalizer falls back to
/// the sanitized name.
///
/// # Examples
///
/// ```
/// use sp_parser::{TitleGuesser, TokenGuesser};
///
/// let g = TokenGuesser.guess("Movie Title 2020 1080p WEB DL x264 GROUP");
/// assert_eq!(g.title.as_deref(), Some("Movie Title"));
/// assert_eq!(g.year, Some(2020));
/// assert_eq!(g.screen_size.as_deref(), Some("1080p"));
/// assert_eq!(g.source.as_deref(), Some("WEB-DL"));
/// assert_eq!(g.release_group.as_deref(), Some("GROUP"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleGuess {
    /// Title text before the first metadata keyword.
    pub title: Option<String>,

    /// Part of the title before an `AKA` separator, when one is present.
    pub primary_title: Option<String>,

    /// Part of the title after an `AKA` separator.
    pub alternative_title: Option<String>,

    /// Release year (1900--2099).
    pub year: Option<u32>,

    pub season: Option<u32>,
    pub episode: Option<u32>,

    /// Words between the episode marker and the next metadata keyword.
    pub episode_title: Option<String>,

    /// Media source, e.g. `"BluRay"`, `"WEB-DL"`, `"HDTV"`.
    pub source: Option<String>,

    pub video_codec: Option<String>,

    /// Audio codec, e.g. `"AAC"`, `"DTS-HD"`, `"TrueHD Atmos"`.
    pub audio_codec: Option<String>,

    /// Whether a subtitle marker was seen.
    pub subtitles: bool,

    /// Screen size, e.g. `"1080p"`. `4K`/`UHD` map to `"2160p"`.
    pub screen_size: Option<String>,

    /// Language markers, uppercased, in order of appearance.
    pub languages: Vec<String>,

    /// Trailing word after the metadata block, if any.
    pub release_group: Option<String>,
}

/// Result of normalizing one raw filesystem name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedName {
    /// Punctuation replaced by single spaces, whitespace collapsed.
    pub sanitized: String,

    /// Sanitized name with known platform tags and trailing crew tags removed.
    pub cleaned: String,

    /// Crew tags stripped from the end of the name, in dictionary spelling.
    pub crew_tags: Vec<String>,

    /// Platform tags found anywhere in the name, in dictionary spelling.
    pub platform_tags: Vec<String>,

    /// What the title guesser recovered from `cleaned`.
    pub guess: TitleGuess,

    /// Canonical title. Never empty for a non-empty input.
    pub title: String,
}

impl NormalizedName {
    pub fn is_episodic(&self) -> bool {
        self.guess.season.is_some() && self.guess.episode.is_some()
    }
}
