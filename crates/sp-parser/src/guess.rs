//! Title guessing over sanitized release names.
//!
//! The guesser operates in three phases:
//! 1. Tokenize the input using the Logos lexer.
//! 2. Find the title boundary: the first metadata keyword (a leading year
//!    is allowed to be part of the title, e.g. `1917 2019 1080p`).
//! 3. Scan the remaining tokens for year, season/episode, source, codecs,
//!    subtitle and language markers, then recover the episode title and
//!    release group from their positions.

use crate::tokenizer::{tokenize, SpannedToken, Token};
use crate::types::TitleGuess;

/// Free-text parser used by the normalizer.
///
/// Implementations must be pure functions of their input.
pub trait TitleGuesser: Send + Sync {
    fn guess(&self, input: &str) -> TitleGuess;
}

/// Default [`TitleGuesser`] backed by the logos tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGuesser;

impl TitleGuesser for TokenGuesser {
    fn guess(&self, input: &str) -> TitleGuess {
        parse(input)
    }
}

fn parse(input: &str) -> TitleGuess {
    let tokens = tokenize(input);
    let mut guess = TitleGuess::default();
    if tokens.is_empty() {
        return guess;
    }

    let stop = title_stop(&tokens);
    extract_title(&tokens[..stop], input, &mut guess);
    extract_metadata(&tokens[stop..], &mut guess);
    extract_release_group(&tokens, stop, &mut guess);
    extract_episode_title(&tokens, input, &mut guess);

    guess
}

// -------------------------------------------------------------------------
// Title
// -------------------------------------------------------------------------

/// Index of the first token that ends the title.
fn title_stop(tokens: &[SpannedToken<'_>]) -> usize {
    tokens
        .iter()
        .enumerate()
        .position(|(i, st)| {
            // A year in first position is a title ("2012", "1917").
            if i == 0 && matches!(st.token, Token::Year(_)) && tokens.len() > 1 {
                return false;
            }
            is_title_stop(&st.token)
        })
        .unwrap_or(tokens.len())
}

fn extract_title(title_tokens: &[SpannedToken<'_>], input: &str, guess: &mut TitleGuess) {
    guess.title = slice(title_tokens, input);

    if let Some(aka) = title_tokens.iter().position(|st| st.token == Token::Aka) {
        guess.primary_title = slice(&title_tokens[..aka], input);
        guess.alternative_title = slice(&title_tokens[aka + 1..], input);
    }
}

/// Original text covered by a run of tokens, or `None` when the run is empty.
fn slice(tokens: &[SpannedToken<'_>], input: &str) -> Option<String> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    let text = input[first.span.start..last.span.end].trim();
    (!text.is_empty()).then(|| text.to_string())
}

// -------------------------------------------------------------------------
// Metadata
// -------------------------------------------------------------------------

fn extract_metadata(tokens: &[SpannedToken<'_>], guess: &mut TitleGuess) {
    let mut has_truehd = false;
    let mut has_atmos = false;
    let mut has_eac3 = false;

    for st in tokens {
        match &st.token {
            Token::Year(text) => {
                if guess.year.is_none() {
                    guess.year = text.parse().ok();
                }
            }

            Token::SeasonEpisode(text) => {
                if guess.season.is_none() {
                    parse_season_episode(text, guess);
                }
            }
            Token::SeasonEpisodeX(text) => {
                if guess.season.is_none() {
                    let mut parts = text.split(['x', 'X']);
                    guess.season = parts.next().and_then(|s| s.parse().ok());
                    guess.episode = parts.next().and_then(|e| e.parse().ok());
                }
            }
            Token::Season(text) | Token::SeasonWord(text) => {
                if guess.season.is_none() {
                    guess.season = trailing_number(text);
                }
            }
            Token::Episode(text) => {
                if guess.episode.is_none() {
                    guess.episode = trailing_number(text);
                }
            }

            Token::Resolution(text) => {
                if guess.screen_size.is_none() {
                    guess.screen_size = Some(text.to_lowercase());
                }
            }
            Token::ResolutionAlias(_) => set_if_none(&mut guess.screen_size, "2160p"),

            Token::SourceBluRay(_) => set_if_none(&mut guess.source, "BluRay"),
            Token::SourceWebDL(_) => set_if_none(&mut guess.source, "WEB-DL"),
            Token::SourceWebRip(_) => set_if_none(&mut guess.source, "WEBRip"),
            Token::SourceWeb(_) => set_if_none(&mut guess.source, "WEB"),
            Token::SourceHDTV(_) => set_if_none(&mut guess.source, "HDTV"),
            Token::SourceDVD(_) => set_if_none(&mut guess.source, "DVDRip"),
            Token::SourceRemux(_) => set_if_none(&mut guess.source, "Remux"),

            Token::CodecH264(_) => set_if_none(&mut guess.video_codec, "H.264"),
            Token::CodecH265(_) => set_if_none(&mut guess.video_codec, "H.265"),
            Token::CodecOther(text) => {
                if guess.video_codec.is_none() {
                    guess.video_codec = Some(text.replace(' ', "").to_uppercase());
                }
            }

            // Compound codecs (TrueHD + Atmos, EAC3 + Atmos) are resolved
            // after the loop.
            Token::AudioDTSHD(_) => set_if_none(&mut guess.audio_codec, "DTS-HD"),
            Token::AudioTrueHD(_) => has_truehd = true,
            Token::AudioAtmos(_) => has_atmos = true,
            Token::AudioEAC3(_) => has_eac3 = true,
            Token::AudioAC3(_) => set_if_none(&mut guess.audio_codec, "AC3"),
            Token::AudioDTS(_) => set_if_none(&mut guess.audio_codec, "DTS"),
            Token::AudioAAC(_) => set_if_none(&mut guess.audio_codec, "AAC"),
            Token::AudioFLAC(_) => set_if_none(&mut guess.audio_codec, "FLAC"),
            Token::AudioOpus(_) => set_if_none(&mut guess.audio_codec, "Opus"),

            Token::Subtitle(_) => guess.subtitles = true,
            Token::Language(text) => {
                let lang = text.to_uppercase();
                if !guess.languages.contains(&lang) {
                    guess.languages.push(lang);
                }
            }

            _ => {}
        }
    }

    if guess.audio_codec.is_none() {
        guess.audio_codec = match (has_truehd, has_eac3, has_atmos) {
            (true, _, true) => Some("TrueHD Atmos".to_string()),
            (true, _, false) => Some("TrueHD".to_string()),
            (false, true, true) => Some("EAC3 Atmos".to_string()),
            (false, true, false) => Some("EAC3".to_string()),
            (false, false, true) => Some("Atmos".to_string()),
            (false, false, false) => None,
        };
    }
}

/// A trailing word after a quality keyword is taken as the release group.
fn extract_release_group(tokens: &[SpannedToken<'_>], stop: usize, guess: &mut TitleGuess) {
    let n = tokens.len();
    if n < 2 || n - 1 <= stop {
        return;
    }
    if let (Token::Word(group), prev) = (&tokens[n - 1].token, &tokens[n - 2].token) {
        if is_quality_keyword(prev) {
            guess.release_group = Some(group.to_string());
        }
    }
}

/// Plain words directly following an `SxxEyy` marker.
fn extract_episode_title(tokens: &[SpannedToken<'_>], input: &str, guess: &mut TitleGuess) {
    let Some(marker) = tokens
        .iter()
        .position(|st| matches!(st.token, Token::SeasonEpisode(_) | Token::SeasonEpisodeX(_)))
    else {
        return;
    };

    let rest = &tokens[marker + 1..];
    let run = rest
        .iter()
        .position(|st| !matches!(st.token, Token::Word(_) | Token::Number(_)))
        .unwrap_or(rest.len());
    guess.episode_title = slice(&rest[..run], input);
}

// -------------------------------------------------------------------------
// Helpers
// -------------------------------------------------------------------------

/// Parse a SeasonEpisode token like "S01E01" or "S02E03E04".
fn parse_season_episode(text: &str, guess: &mut TitleGuess) {
    let upper = text.to_uppercase();
    let after_s = &upper[1..];
    if let Some(e_pos) = after_s.find('E') {
        guess.season = after_s[..e_pos].parse().ok();
        guess.episode = after_s[e_pos..]
            .split('E')
            .find(|s| !s.is_empty())
            .and_then(|s| s.parse().ok());
    }
}

fn trailing_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    text[start..].trim().parse().ok()
}

fn set_if_none(field: &mut Option<String>, value: &str) {
    if field.is_none() {
        *field = Some(value.to_string());
    }
}

/// Whether a token should stop the title scan.
fn is_title_stop(token: &Token) -> bool {
    !matches!(token, Token::Word(_) | Token::Number(_) | Token::Aka)
}

/// Keywords that describe the encode rather than the content.
fn is_quality_keyword(token: &Token) -> bool {
    !matches!(
        token,
        Token::Word(_)
            | Token::Number(_)
            | Token::Aka
            | Token::Year(_)
            | Token::SeasonEpisode(_)
            | Token::SeasonEpisodeX(_)
            | Token::Season(_)
            | Token::SeasonWord(_)
            | Token::Episode(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(input: &str) -> TitleGuess {
        TokenGuesser.guess(input)
    }

    #[test]
    fn test_basic_movie() {
        let g = guess("Movie Title 2020 1080p WEB DL x264 GROUP");
        assert_eq!(g.title.as_deref(), Some("Movie Title"));
        assert_eq!(g.year, Some(2020));
        assert_eq!(g.screen_size.as_deref(), Some("1080p"));
        assert_eq!(g.source.as_deref(), Some("WEB-DL"));
        assert_eq!(g.video_codec.as_deref(), Some("H.264"));
        assert_eq!(g.release_group.as_deref(), Some("GROUP"));
        assert_eq!(g.season, None);
    }

    #[test]
    fn test_leading_year_is_title() {
        let g = guess("1917 2019 1080p BluRay x264");
        assert_eq!(g.title.as_deref(), Some("1917"));
        assert_eq!(g.year, Some(2019));
    }

    #[test]
    fn test_episode_with_title() {
        let g = guess("Show Name S01E02 The Pilot 720p HDTV");
        assert_eq!(g.title.as_deref(), Some("Show Name"));
        assert_eq!(g.season, Some(1));
        assert_eq!(g.episode, Some(2));
        assert_eq!(g.episode_title.as_deref(), Some("The Pilot"));
        assert_eq!(g.source.as_deref(), Some("HDTV"));
    }

    #[test]
    fn test_season_pack_forms() {
        let g = guess("Show Name S02 1080p WEB DL");
        assert_eq!(g.season, Some(2));
        assert_eq!(g.episode, None);
        assert_eq!(g.episode_title, None);

        let g = guess("Show Name Season 3 720p");
        assert_eq!(g.season, Some(3));
    }

    #[test]
    fn test_x_notation() {
        let g = guess("Show 3x07 Episode Name");
        assert_eq!(g.title.as_deref(), Some("Show"));
        assert_eq!(g.season, Some(3));
        assert_eq!(g.episode, Some(7));
        assert_eq!(g.episode_title.as_deref(), Some("Episode Name"));
    }

    #[test]
    fn test_aka_split() {
        let g = guess("La Casa de Papel AKA Money Heist S01E01 1080p");
        assert_eq!(g.primary_title.as_deref(), Some("La Casa de Papel"));
        assert_eq!(g.alternative_title.as_deref(), Some("Money Heist"));
        assert_eq!(g.title.as_deref(), Some("La Casa de Papel AKA Money Heist"));
    }

    #[test]
    fn test_audio_and_subs() {
        let g = guess("Movie 2023 2160p BluRay TrueHD 7 1 Atmos HEVC SUBS ITA ENG");
        assert_eq!(g.audio_codec.as_deref(), Some("TrueHD Atmos"));
        assert!(g.subtitles);
        assert_eq!(g.languages, vec!["ITA".to_string(), "ENG".to_string()]);
        assert_eq!(g.screen_size.as_deref(), Some("2160p"));
    }

    #[test]
    fn test_uhd_alias() {
        let g = guess("Movie 2021 UHD BluRay");
        assert_eq!(g.screen_size.as_deref(), Some("2160p"));
    }

    #[test]
    fn test_dd51() {
        let g = guess("Show S01E01 720p WEB DL DD5 1 H 264 DEMAND");
        assert_eq!(g.audio_codec.as_deref(), Some("AC3"));
        assert_eq!(g.release_group.as_deref(), Some("DEMAND"));
        assert_eq!(g.episode_title, None);
    }

    #[test]
    fn test_no_title() {
        let g = guess("1080p x264");
        assert_eq!(g.title, None);
        assert_eq!(g.primary_title, None);

        let g = guess("");
        assert_eq!(g, TitleGuess::default());
    }

    #[test]
    fn test_plain_name() {
        let g = guess("My Movie");
        assert_eq!(g.title.as_deref(), Some("My Movie"));
        assert_eq!(g.year, None);
        assert_eq!(g.release_group, None);
    }
}
