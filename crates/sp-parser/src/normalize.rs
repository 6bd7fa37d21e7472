//! Filename normalization.
//!
//! [`sanitize`] turns punctuation into spaces. [`Normalizer`] then removes
//! platform tags anywhere and crew tags at the end, and hands the remainder
//! to a [`TitleGuesser`].

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::guess::{TitleGuesser, TokenGuesser};
use crate::tags::TagDictionary;
use crate::types::NormalizedName;

/// Characters replaced by a single space during sanitization.
pub const MARKS: &[char] = &[
    '.', ',', '_', '-', '[', ']', '(', ')', '{', '}', ':', ';', '!', '?', '~', '|', '/', '\\',
    '#', '"', '*', '@',
];

/// Replace every mark with a space and collapse whitespace.
///
/// Sanitization is a fixed point: `sanitize(&sanitize(s)) == sanitize(s)`.
///
/// # Examples
///
/// ```
/// use sp_parser::sanitize;
///
/// assert_eq!(sanitize("Movie.Title.2020.WEB-DL.x264-GROUP"), "Movie Title 2020 WEB DL x264 GROUP");
/// assert_eq!(sanitize("  [Show]__Name  "), "Show Name");
/// ```
pub fn sanitize(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || MARKS.contains(&c))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extra dictionary entries for the normalizer (`[tags]` config section).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Additional crew tags, merged with the built-in list.
    pub extra_crew: Vec<String>,
    /// Additional platform tags, merged with the built-in list.
    pub extra_platform: Vec<String>,
}

/// Strips tag noise from names and extracts a canonical title.
#[derive(Clone)]
pub struct Normalizer {
    tags: TagDictionary,
    /// Crew tag as the last token, anchored at the end.
    crew_re: Regex,
    /// Platform tag anywhere, on word boundaries.
    platform_re: Regex,
    guesser: Arc<dyn TitleGuesser>,
}

impl Normalizer {
    /// Build a normalizer with the default [`TokenGuesser`].
    pub fn new(config: NormalizerConfig) -> sp_core::Result<Self> {
        Self::with_guesser(config, Arc::new(TokenGuesser))
    }

    /// Build a normalizer around a custom title guesser.
    pub fn with_guesser(
        config: NormalizerConfig,
        guesser: Arc<dyn TitleGuesser>,
    ) -> sp_core::Result<Self> {
        let extra_crew: Vec<String> = config.extra_crew.iter().map(|t| sanitize(t)).collect();
        let extra_platform: Vec<String> =
            config.extra_platform.iter().map(|t| sanitize(t)).collect();
        let tags = TagDictionary::new(&extra_crew, &extra_platform);

        let crew_re = compile(&format!(r"(?i)(?:^|\s)({})$", alternation(tags.crew())))?;
        let platform_re = compile(&format!(r"(?i)\b(?:{})\b", alternation(tags.platform())))?;

        Ok(Self {
            tags,
            crew_re,
            platform_re,
            guesser,
        })
    }

    /// Normalize one raw filesystem name (no extension).
    pub fn normalize(&self, raw: &str) -> NormalizedName {
        let sanitized = sanitize(raw);

        let mut platform_tags: Vec<String> = Vec::new();
        for m in self.platform_re.find_iter(&sanitized) {
            let tag = self.tags.canonical_platform(m.as_str());
            if !platform_tags.contains(&tag) {
                platform_tags.push(tag);
            }
        }
        let without_platform = sanitize(&self.platform_re.replace_all(&sanitized, " "));

        let (cleaned, crew_tags) = self.strip_trailing_crew(without_platform);

        let guess = self.guesser.guess(&cleaned);
        let title = guess
            .primary_title
            .clone()
            .or_else(|| guess.title.clone())
            .unwrap_or_else(|| sanitized.clone());

        NormalizedName {
            sanitized,
            cleaned,
            crew_tags,
            platform_tags,
            guess,
            title,
        }
    }

    /// Remove crew tags from the end until none is left trailing.
    fn strip_trailing_crew(&self, mut name: String) -> (String, Vec<String>) {
        let mut found = Vec::new();
        while let Some(caps) = self.crew_re.captures(&name) {
            let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            found.push(self.tags.canonical_crew(tag.as_str()));
            let cut = whole.start();
            name.truncate(cut);
            name.truncate(name.trim_end().len());
        }
        found.reverse();
        (name, found)
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("crew", &self.tags.crew().len())
            .field("platform", &self.tags.platform().len())
            .finish_non_exhaustive()
    }
}

fn alternation(tags: &[String]) -> String {
    tags.iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> sp_core::Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| sp_core::Error::Validation(format!("invalid tag pattern: {e}")))
}
