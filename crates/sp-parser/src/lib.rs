//! sp-parser: release-name normalization for media filenames.
//!
//! Turns noisy names such as `"Movie.Title.2020.1080p.WEB-DL.x264-GROUP"`
//! into a canonical title plus whatever free-text metadata can be recovered.
//!
//! # Quick start
//!
//! ```
//! use sp_parser::{Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();
//! let n = normalizer.normalize("Game.Name.PS4-CODEX");
//! assert_eq!(n.title, "Game Name");
//! assert_eq!(n.crew_tags, vec!["CODEX".to_string()]);
//! assert_eq!(n.platform_tags, vec!["PS4".to_string()]);
//! ```

pub mod guess;
pub mod normalize;
pub mod season;
pub mod tags;
pub mod tokenizer;
pub mod types;

pub use guess::{TitleGuesser, TokenGuesser};
pub use normalize::{sanitize, Normalizer, NormalizerConfig};
pub use season::{is_episode_marker, is_season_pack};
pub use tags::TagDictionary;
pub use types::{NormalizedName, TitleGuess};
