//! Audio language detection.
//!
//! Languages are reported as ISO 639-2/B codes (`"eng"`, `"ita"`, `"ger"`).
//! A release name is searched first for a standalone uppercase 2 or 3 letter
//! code; the container's audio tracks are the fallback.

use phf::phf_map;

/// Reported when neither the name nor the container yields a language.
pub const NOT_FOUND: &str = "not found";

/// ISO 639-1 to ISO 639-2/B.
///
/// Two-letter words that routinely appear in release names as something
/// else (`SD`, `TS`, `DV`, `HI`, `UK`) are left out.
static ALPHA2: phf::Map<&'static str, &'static str> = phf_map! {
    "ar" => "ara",
    "cs" => "cze",
    "da" => "dan",
    "de" => "ger",
    "el" => "gre",
    "en" => "eng",
    "es" => "spa",
    "fi" => "fin",
    "fr" => "fre",
    "he" => "heb",
    "hu" => "hun",
    "it" => "ita",
    "ja" => "jpn",
    "ko" => "kor",
    "nl" => "dut",
    "no" => "nor",
    "pl" => "pol",
    "pt" => "por",
    "ro" => "rum",
    "ru" => "rus",
    "sv" => "swe",
    "th" => "tha",
    "tr" => "tur",
    "zh" => "chi",
};

/// ISO 639-2 (B and T forms) to ISO 639-2/B.
static ALPHA3: phf::Map<&'static str, &'static str> = phf_map! {
    "ara" => "ara",
    "chi" => "chi",
    "zho" => "chi",
    "cze" => "cze",
    "ces" => "cze",
    "dan" => "dan",
    "dut" => "dut",
    "nld" => "dut",
    "eng" => "eng",
    "fin" => "fin",
    "fre" => "fre",
    "fra" => "fre",
    "ger" => "ger",
    "deu" => "ger",
    "gre" => "gre",
    "ell" => "gre",
    "heb" => "heb",
    "hin" => "hin",
    "hun" => "hun",
    "ita" => "ita",
    "jpn" => "jpn",
    "kor" => "kor",
    "nor" => "nor",
    "pol" => "pol",
    "por" => "por",
    "rum" => "rum",
    "ron" => "rum",
    "rus" => "rus",
    "spa" => "spa",
    "swe" => "swe",
    "tha" => "tha",
    "tur" => "tur",
    "ukr" => "ukr",
};

/// Normalize an ISO 639-1 or 639-2 code to its 639-2/B form.
///
/// ```
/// use sceneprep::bundle::language::to_alpha3;
///
/// assert_eq!(to_alpha3("it"), Some("ita"));
/// assert_eq!(to_alpha3("DEU"), Some("ger"));
/// assert_eq!(to_alpha3("xx"), None);
/// ```
pub fn to_alpha3(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_lowercase();
    match code.len() {
        2 => ALPHA2.get(code.as_str()).copied(),
        3 => ALPHA3.get(code.as_str()).copied(),
        _ => None,
    }
}

/// Language codes written as standalone uppercase tokens in a sanitized name.
pub fn languages_in_name(name: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for token in name.split_whitespace() {
        if !(2..=3).contains(&token.len()) || !token.bytes().all(|b| b.is_ascii_uppercase()) {
            continue;
        }
        if let Some(code) = to_alpha3(token) {
            if !found.iter().any(|f| f == code) {
                found.push(code.to_string());
            }
        }
    }
    found
}

/// Normalize container language tags, keeping unknown codes as-is.
pub fn normalize_container_languages(languages: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for lang in languages {
        let code = to_alpha3(lang)
            .map(str::to_string)
            .unwrap_or_else(|| lang.to_ascii_lowercase());
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

/// Whether a release with `languages` satisfies `preferred` ("all" matches anything).
pub fn matches_preference(languages: &[String], preferred: &str) -> bool {
    if preferred.eq_ignore_ascii_case("all") {
        return true;
    }
    let wanted = to_alpha3(preferred)
        .map(str::to_string)
        .unwrap_or_else(|| preferred.to_ascii_lowercase());
    languages.iter().any(|l| *l == wanted)
}
