//! Logos-based tokenizer for sanitized release names.
//!
//! Input is expected to be the output of [`crate::sanitize`]: punctuation
//! already replaced by single spaces. Multi-part keywords that used to be
//! joined by dots or hyphens (`WEB-DL`, `H.264`, `DD5.1`) therefore match
//! with an optional space between their parts.

use logos::Logos;

/// Token types emitted by the Logos lexer.
///
/// More specific patterns receive higher priorities so they win when
/// multiple regexes match the same span. Logos always prefers the longest
/// match, so `Webster` stays a [`Token::Word`] while `WEB` is a source.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token<'src> {
    // -----------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------
    /// Screen size with scan suffix: 2160p, 1080i, 576p, ...
    #[regex(r"(?i)(4320|2160|1440|1080|720|576|480)[pi]", priority = 10)]
    Resolution(&'src str),

    /// 4K / UHD, treated as 2160p.
    #[regex(r"(?i)(4K|UHD)", priority = 9)]
    ResolutionAlias(&'src str),

    // -----------------------------------------------------------------
    // Source
    // -----------------------------------------------------------------
    #[regex(r"(?i)(Blu ?Ray|BRRip|BDRip)", priority = 8)]
    SourceBluRay(&'src str),

    #[regex(r"(?i)WEB ?DL", priority = 8)]
    SourceWebDL(&'src str),

    #[regex(r"(?i)WEB ?Rip", priority = 8)]
    SourceWebRip(&'src str),

    /// Bare WEB source (lower priority than WEB-DL / WEBRip).
    #[regex(r"(?i)WEB", priority = 5)]
    SourceWeb(&'src str),

    #[regex(r"(?i)(HDTV|PDTV)", priority = 8)]
    SourceHDTV(&'src str),

    #[regex(r"(?i)(DVDRip|DVD)", priority = 8)]
    SourceDVD(&'src str),

    #[regex(r"(?i)Remux", priority = 8)]
    SourceRemux(&'src str),

    // -----------------------------------------------------------------
    // Video codecs
    // -----------------------------------------------------------------
    #[regex(r"(?i)(x264|H ?264|AVC)", priority = 9)]
    CodecH264(&'src str),

    #[regex(r"(?i)(x265|H ?265|HEVC)", priority = 9)]
    CodecH265(&'src str),

    #[regex(r"(?i)(AV1|VP9|XviD|DivX|MPEG ?2)", priority = 8)]
    CodecOther(&'src str),

    // -----------------------------------------------------------------
    // Audio codecs (optionally followed by a channel layout like "5 1")
    // -----------------------------------------------------------------
    /// DTS-HD / DTS-HD MA (must be higher priority than plain DTS).
    #[regex(r"(?i)DTS ?HD( ?MA)?( ?[1-9] [01])?", priority = 10)]
    AudioDTSHD(&'src str),

    #[regex(r"(?i)TrueHD( ?[1-9] [01])?", priority = 9)]
    AudioTrueHD(&'src str),

    #[regex(r"(?i)Atmos", priority = 9)]
    AudioAtmos(&'src str),

    /// E-AC-3 / DD+ / DDP.
    #[regex(r"(?i)(E ?AC ?3|DD\+|DDP)( ?[1-9] [01])?", priority = 9)]
    AudioEAC3(&'src str),

    /// AC3 / DD5.1.
    #[regex(r"(?i)(AC ?3|DD ?[1-9] [01])", priority = 7)]
    AudioAC3(&'src str),

    #[regex(r"(?i)DTS( ?[1-9] [01])?", priority = 6)]
    AudioDTS(&'src str),

    #[regex(r"(?i)AAC( ?[1-9] [01])?", priority = 8)]
    AudioAAC(&'src str),

    #[regex(r"(?i)FLAC( ?[1-9] [01])?", priority = 8)]
    AudioFLAC(&'src str),

    #[regex(r"(?i)Opus( ?[1-9] [01])?", priority = 8)]
    AudioOpus(&'src str),

    // -----------------------------------------------------------------
    // HDR
    // -----------------------------------------------------------------
    #[regex(r"(?i)(HDR10\+?|HDR|DoVi|Dolby ?Vision|HLG)", priority = 8)]
    Hdr(&'src str),

    /// Dolby Vision short form; uppercase only so it doesn't eat words.
    #[regex("DV", priority = 8)]
    DolbyVision(&'src str),

    // -----------------------------------------------------------------
    // Edition / revision
    // -----------------------------------------------------------------
    #[regex(r"(?i)(Extended|Unrated|Remastered|IMAX|Theatrical|Directors? ?Cut|Special Edition)", priority = 7)]
    Edition(&'src str),

    #[regex(r"(?i)(PROPER|REPACK|RERIP)", priority = 7)]
    Revision(&'src str),

    // -----------------------------------------------------------------
    // Subtitles / languages
    // -----------------------------------------------------------------
    #[regex(r"(?i)(SUBS?|SUBBED|MULTISUBS?|HARDSUBS?|SOFTSUBS?|VOSTFR)", priority = 7)]
    Subtitle(&'src str),

    /// Language markers. Uppercase only, so that `English` inside a title
    /// stays a word.
    #[regex(r"(MULTI|MULTi|DUAL|TRUEFRENCH|FRENCH|GERMAN|ITALIAN|SPANISH|ENGLISH|JAPANESE|KOREAN|ITA|ENG|FRA|GER|SPA|JPN)", priority = 6)]
    Language(&'src str),

    // -----------------------------------------------------------------
    // Season / Episode
    // -----------------------------------------------------------------
    /// Season+episode tag, e.g. S01E01, S01E01E02 (multi-episode).
    #[regex(r"(?i)S\d{1,2}E\d{1,3}(E\d{1,3})*", priority = 12)]
    SeasonEpisode(&'src str),

    /// Alternate season+episode form, e.g. 1x05.
    #[regex(r"\d{1,2}[xX]\d{2,3}", priority = 11)]
    SeasonEpisodeX(&'src str),

    /// Season without episode, e.g. S03.
    #[regex(r"(?i)S\d{1,2}", priority = 10)]
    Season(&'src str),

    /// Spelled-out season, e.g. "Season 3".
    #[regex(r"(?i)Season ?\d{1,2}", priority = 10)]
    SeasonWord(&'src str),

    /// Episode without season, e.g. E07, Ep07.
    #[regex(r"(?i)EP?\d{1,3}", priority = 10)]
    Episode(&'src str),

    // -----------------------------------------------------------------
    // Year / structure
    // -----------------------------------------------------------------
    /// Four-digit year 1900--2099.
    #[regex(r"(19|20)\d{2}", priority = 5)]
    Year(&'src str),

    /// "AKA" separator between a title and its alternative.
    #[regex(r"(?i)AKA", priority = 6)]
    Aka,

    /// Generic word token (lowest priority -- anything not matched above).
    #[regex(r"[^ \t0-9][^ \t]*", priority = 1)]
    Word(&'src str),

    /// Numeric token.
    #[regex(r"\d+", priority = 2)]
    Number(&'src str),
}

/// A token together with the byte span it occupies in the original input.
#[derive(Debug, Clone)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Tokenize an input string into a `Vec` of spanned tokens.
pub fn tokenize(input: &str) -> Vec<SpannedToken<'_>> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| SpannedToken { token, span }))
        .collect()
}
