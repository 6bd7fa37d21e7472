//! Core types for media probe results.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sp_core::{ResolutionBucket, ScanType};

/// Media file information extracted by probing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Path to the probed file.
    pub file_path: PathBuf,
    /// Container format as reported by the tool.
    pub container: String,
    /// Total duration (if determinable).
    pub duration: Option<Duration>,
    pub video_tracks: Vec<VideoTrack>,
    pub audio_tracks: Vec<AudioTrack>,
}

impl MediaInfo {
    /// Returns the primary video track.
    ///
    /// Prefers the first track marked as default; falls back to the first track.
    pub fn primary_video(&self) -> Option<&VideoTrack> {
        self.video_tracks
            .iter()
            .find(|t| t.default)
            .or_else(|| self.video_tracks.first())
    }

    /// Decoded height of the primary video track, if non-zero.
    pub fn video_height(&self) -> Option<u32> {
        self.primary_video().map(|v| v.height).filter(|h| *h > 0)
    }

    /// Ladder bucket of the primary video track.
    ///
    /// The declared scan type wins; the secondary interlaced flag is used
    /// when it is missing.
    pub fn resolution(&self) -> ResolutionBucket {
        let video = self.primary_video();
        ResolutionBucket::resolve(
            self.video_height(),
            video.and_then(|v| v.scan_type),
            video.and_then(|v| v.interlaced),
        )
    }

    /// Distinct audio languages in track order, lowercased.
    ///
    /// Undetermined markers (`und`, `zxx`, empty) are dropped.
    pub fn audio_languages(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for lang in self.audio_tracks.iter().filter_map(|t| t.language.as_deref()) {
            let lang = lang.trim().to_lowercase();
            if lang.is_empty() || lang == "und" || lang == "zxx" || out.contains(&lang) {
                continue;
            }
            out.push(lang);
        }
        out
    }
}

/// A video track within a media file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoTrack {
    pub index: u32,
    pub codec: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels (0 when unknown).
    pub height: u32,
    /// Scan type declared by the container, when it says.
    pub scan_type: Option<ScanType>,
    /// Secondary interlacing signal (field order, scan order), consulted
    /// when `scan_type` is absent.
    pub interlaced: Option<bool>,
    /// Whether this is the default track.
    pub default: bool,
}

/// An audio track within a media file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioTrack {
    pub index: u32,
    pub codec: String,
    /// Number of channels.
    pub channels: u32,
    /// Language code as tagged in the container (ISO 639-1 or 639-2).
    pub language: Option<String>,
    pub default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(lang: Option<&str>) -> AudioTrack {
        AudioTrack {
            language: lang.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn primary_video_prefers_default() {
        let info = MediaInfo {
            video_tracks: vec![
                VideoTrack { index: 0, height: 480, ..Default::default() },
                VideoTrack { index: 1, height: 1080, default: true, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(info.primary_video().map(|v| v.index), Some(1));
        assert_eq!(info.video_height(), Some(1080));
    }

    #[test]
    fn zero_height_is_unknown() {
        let info = MediaInfo {
            video_tracks: vec![VideoTrack::default()],
            ..Default::default()
        };
        assert_eq!(info.video_height(), None);
    }

    #[test]
    fn resolution_uses_secondary_interlaced_flag() {
        let info = MediaInfo {
            video_tracks: vec![VideoTrack {
                height: 1080,
                interlaced: Some(true),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(info.resolution().to_string(), "1080i");
        assert!(MediaInfo::default().resolution().is_other());
    }

    #[test]
    fn audio_languages_dedup_and_skip_undetermined() {
        let info = MediaInfo {
            audio_tracks: vec![audio(Some("ITA")), audio(Some("und")), audio(None), audio(Some("ita")), audio(Some("eng"))],
            ..Default::default()
        };
        assert_eq!(info.audio_languages(), vec!["ita".to_string(), "eng".to_string()]);
    }
}
