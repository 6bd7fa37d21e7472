//! Known crew and platform tags.
//!
//! Crew tags identify game release groups, platform tags identify target
//! hardware. Either one marks a release as a game. Lookups are
//! case-insensitive; keys are stored lowercase and map to the spelling used
//! in output.

use phf::phf_map;

/// Game release crews, lowercase key to display spelling.
pub static CREW_TAGS: phf::Map<&'static str, &'static str> = phf_map! {
    "codex" => "CODEX",
    "skidrow" => "SKIDROW",
    "reloaded" => "RELOADED",
    "plaza" => "PLAZA",
    "cpy" => "CPY",
    "flt" => "FLT",
    "doge" => "DOGE",
    "tenoke" => "TENOKE",
    "rune" => "RUNE",
    "empress" => "EMPRESS",
    "goldberg" => "GOLDBERG",
    "darksiders" => "DARKSiDERS",
    "razor1911" => "RAZOR1911",
    "prophet" => "PROPHET",
    "hoodlum" => "HOODLUM",
    "tinyiso" => "TiNYiSO",
    "fitgirl" => "FitGirl",
    "dodi" => "DODI",
    "elamigos" => "ElAmigos",
    "kaos" => "KaOs",
    "gog" => "GOG",
    "simplex" => "SiMPLEX",
};

/// Target platforms, lowercase key to display spelling.
///
/// `Switch` is left out on purpose: it is a common title word.
pub static PLATFORM_TAGS: phf::Map<&'static str, &'static str> = phf_map! {
    "pc" => "PC",
    "win32" => "Win32",
    "win64" => "Win64",
    "linux" => "Linux",
    "macos" => "MacOS",
    "osx" => "OSX",
    "ps3" => "PS3",
    "ps4" => "PS4",
    "ps5" => "PS5",
    "psp" => "PSP",
    "psvita" => "PSVita",
    "nsw" => "NSW",
    "xbox" => "XBOX",
    "x360" => "X360",
    "xboxone" => "XBOXONE",
    "wii" => "Wii",
    "wiiu" => "WiiU",
    "3ds" => "3DS",
    "nds" => "NDS",
};

/// Crew and platform dictionaries, built-in entries plus configured extras.
#[derive(Debug, Clone)]
pub struct TagDictionary {
    crew: Vec<String>,
    platform: Vec<String>,
}

impl TagDictionary {
    /// Built-in dictionaries extended with `extra_crew` / `extra_platform`.
    /// Extras that duplicate a built-in entry (ignoring case) are dropped.
    pub fn new(extra_crew: &[String], extra_platform: &[String]) -> Self {
        Self {
            crew: merge(&CREW_TAGS, extra_crew),
            platform: merge(&PLATFORM_TAGS, extra_platform),
        }
    }

    pub fn crew(&self) -> &[String] {
        &self.crew
    }

    pub fn platform(&self) -> &[String] {
        &self.platform
    }

    /// Display spelling of a crew tag matched in any case.
    pub fn canonical_crew(&self, found: &str) -> String {
        canonical(&self.crew, found)
    }

    /// Display spelling of a platform tag matched in any case.
    pub fn canonical_platform(&self, found: &str) -> String {
        canonical(&self.platform, found)
    }
}

impl Default for TagDictionary {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

fn merge(builtin: &phf::Map<&'static str, &'static str>, extra: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = builtin.values().map(|v| v.to_string()).collect();
    for tag in extra {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    // Longest first so alternations prefer `XBOXONE` over `XBOX`.
    tags.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tags
}

fn canonical(tags: &[String], found: &str) -> String {
    tags.iter()
        .find(|t| t.eq_ignore_ascii_case(found))
        .cloned()
        .unwrap_or_else(|| found.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_lowercase_keyed() {
        assert_eq!(CREW_TAGS.get("codex"), Some(&"CODEX"));
        assert_eq!(PLATFORM_TAGS.get("ps4"), Some(&"PS4"));
        assert!(PLATFORM_TAGS.get("switch").is_none());
    }

    #[test]
    fn extras_are_merged_once() {
        let dict = TagDictionary::new(&["NewCrew".into(), "codex".into()], &["Stadia".into()]);
        assert!(dict.crew().iter().any(|t| t == "NewCrew"));
        assert_eq!(dict.crew().iter().filter(|t| t.eq_ignore_ascii_case("codex")).count(), 1);
        assert!(dict.platform().iter().any(|t| t == "Stadia"));
    }

    #[test]
    fn longest_first() {
        let dict = TagDictionary::default();
        let xbox = dict.platform().iter().position(|t| t == "XBOX").unwrap();
        let xboxone = dict.platform().iter().position(|t| t == "XBOXONE").unwrap();
        assert!(xboxone < xbox);
    }

    #[test]
    fn canonical_spelling() {
        let dict = TagDictionary::default();
        assert_eq!(dict.canonical_crew("tinyiso"), "TiNYiSO");
        assert_eq!(dict.canonical_platform("nsw"), "NSW");
    }
}
