//! Release categories and scan type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of release categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movie,
    TvShow,
    Game,
    Document,
}

impl Category {
    /// Whether releases of this category take part in duplicate checking.
    pub fn is_dupe_checked(self) -> bool {
        !matches!(self, Category::Document)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::TvShow => "tv_show",
            Category::Game => "game",
            Category::Document => "document",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Lenient parse used at the catalog boundary, where categories arrive in
    /// whatever spelling the remote side uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "movie" | "movies" | "film" => Ok(Category::Movie),
            "tv" | "tv_show" | "tvshow" | "series" | "show" => Ok(Category::TvShow),
            "game" | "games" => Ok(Category::Game),
            "document" | "documents" | "ebook" | "book" => Ok(Category::Document),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Progressive or interlaced video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Progressive,
    Interlaced,
}

impl ScanType {
    /// Suffix appended to a resolution label.
    pub fn suffix(self) -> char {
        match self {
            ScanType::Progressive => 'p',
            ScanType::Interlaced => 'i',
        }
    }
}
