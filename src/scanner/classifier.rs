//! Category classification for scanned items.
//!
//! The rules are applied in a fixed order:
//!
//! 1. **Document**: the item is a document (by extension for files, or a
//!    folder that holds documents and no video).
//! 2. **Game**: at least one crew or platform tag was found in the name.
//! 3. **TvShow**: the title guesser found a season number.
//! 4. **Movie**: everything else.

use sp_core::Category;
use sp_parser::NormalizedName;

/// What kind of payload the item carries, as far as the scanner can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Video,
    Document,
    /// Neither allowlist matched (game folders, ISO images, ...).
    Other,
}

/// Assign a category to a normalized name.
pub fn classify(name: &NormalizedName, payload: Payload) -> Category {
    if payload == Payload::Document {
        return Category::Document;
    }

    if !name.crew_tags.is_empty() || !name.platform_tags.is_empty() {
        return Category::Game;
    }

    if name.guess.season.is_some() {
        Category::TvShow
    } else {
        Category::Movie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_parser::{Normalizer, NormalizerConfig};

    fn name(raw: &str) -> NormalizedName {
        Normalizer::new(NormalizerConfig::default())
            .unwrap()
            .normalize(raw)
    }

    #[test]
    fn document_extension_wins() {
        // Crew tag and season marker are both present
        let n = name("Manual.S01-CODEX");
        assert_eq!(classify(&n, Payload::Document), Category::Document);
    }

    #[test]
    fn crew_tag_means_game() {
        assert_eq!(classify(&name("Some.Game-CODEX"), Payload::Other), Category::Game);
    }

    #[test]
    fn platform_tag_means_game() {
        assert_eq!(classify(&name("Some Game NSW"), Payload::Other), Category::Game);
    }

    #[test]
    fn season_means_tv() {
        assert_eq!(
            classify(&name("Show.Name.S02.1080p.WEB-DL"), Payload::Video),
            Category::TvShow
        );
        assert_eq!(
            classify(&name("Show.Name.S02E05.720p.HDTV"), Payload::Video),
            Category::TvShow
        );
    }

    #[test]
    fn default_is_movie() {
        let n = name("Movie.Title.2020.1080p.WEB-DL.x264-GROUP");
        assert_eq!(classify(&n, Payload::Video), Category::Movie);
    }

    #[test]
    fn game_only_with_tags() {
        for raw in [
            "Movie.Title.2020.1080p.BluRay.x264-GROUP",
            "Show.S01E01",
            "Plain Name",
            "Game.Name.PS4-CODEX",
            "Other.Game-RUNE",
        ] {
            let n = name(raw);
            let category = classify(&n, Payload::Video);
            if category == Category::Game {
                assert!(!n.crew_tags.is_empty() || !n.platform_tags.is_empty(), "{raw}");
            }
        }
    }
}
