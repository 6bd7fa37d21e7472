//! MediaInfo-based media probing.
//!
//! MediaInfo reports the scan type directly (`ScanType`) and, separately,
//! the field order (`ScanOrder`), which serves as the secondary interlacing
//! signal when the scan type is missing.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use sp_core::{Error, Result, ScanType};

use crate::prober::Prober;
use crate::types::{AudioTrack, MediaInfo, VideoTrack};

#[derive(Debug, Deserialize)]
struct MediaInfoOutput {
    media: Option<MediaInfoMedia>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoMedia {
    #[serde(default)]
    track: Vec<MediaInfoTrack>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoTrack {
    #[serde(rename = "@type")]
    track_type: String,
    #[serde(rename = "Format")]
    format: Option<String>,
    #[serde(rename = "Duration")]
    duration: Option<String>,
    #[serde(rename = "Width")]
    width: Option<String>,
    #[serde(rename = "Height")]
    height: Option<String>,
    #[serde(rename = "ScanType")]
    scan_type: Option<String>,
    #[serde(rename = "ScanOrder")]
    scan_order: Option<String>,
    #[serde(rename = "Channels")]
    channels: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
    #[serde(rename = "Default")]
    default: Option<String>,
}

/// Prober backed by the `mediainfo` executable.
#[derive(Debug, Clone)]
pub struct MediaInfoProber {
    binary: PathBuf,
}

impl MediaInfoProber {
    /// Use `mediainfo` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("mediainfo")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for MediaInfoProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for MediaInfoProber {
    fn name(&self) -> &'static str {
        "mediainfo"
    }

    fn supports(&self, path: &Path) -> bool {
        sp_core::paths::is_video_file(path)
    }

    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let output = Command::new(&self.binary)
            .arg("--Output=JSON")
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool("mediainfo", "not found in PATH")
                } else {
                    Error::from(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool("mediainfo", stderr.trim().to_string()));
        }

        let json = String::from_utf8(output.stdout)
            .map_err(|e| Error::tool("mediainfo", format!("invalid UTF-8: {e}")))?;
        parse_mediainfo_json(path, &json)
    }
}

/// Parse `mediainfo --Output=JSON` output.
pub fn parse_mediainfo_json(path: &Path, json: &str) -> Result<MediaInfo> {
    let output: MediaInfoOutput = serde_json::from_str(json)
        .map_err(|e| Error::Probe(format!("mediainfo output: {e}")))?;
    let media = output
        .media
        .ok_or_else(|| Error::Probe(format!("mediainfo: no media section for {}", path.display())))?;

    let mut info = MediaInfo {
        file_path: path.to_path_buf(),
        ..Default::default()
    };

    for track in media.track {
        match track.track_type.as_str() {
            "General" => {
                info.container = track.format.unwrap_or_default();
                info.duration = track
                    .duration
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .map(Duration::from_secs_f64);
            }
            "Video" => {
                info.video_tracks.push(VideoTrack {
                    index: info.video_tracks.len() as u32,
                    codec: track.format.unwrap_or_default(),
                    width: track.width.and_then(|s| parse_numeric(&s)).unwrap_or(0),
                    height: track.height.and_then(|s| parse_numeric(&s)).unwrap_or(0),
                    scan_type: parse_scan_type(track.scan_type.as_deref()),
                    interlaced: parse_scan_order(track.scan_order.as_deref()),
                    default: track.default.as_deref() == Some("Yes"),
                });
            }
            "Audio" => {
                info.audio_tracks.push(AudioTrack {
                    index: info.audio_tracks.len() as u32,
                    codec: track.format.unwrap_or_default(),
                    channels: track.channels.and_then(|s| parse_numeric(&s)).unwrap_or(2),
                    language: track.language,
                    default: track.default.as_deref() == Some("Yes"),
                });
            }
            _ => {}
        }
    }

    Ok(info)
}

fn parse_numeric<T: std::str::FromStr>(s: &str) -> Option<T> {
    // Remove non-numeric suffixes like " pixels" or " channels"
    s.split_whitespace().next().and_then(|n| n.parse().ok())
}

fn parse_scan_type(value: Option<&str>) -> Option<ScanType> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "progressive" => Some(ScanType::Progressive),
        "interlaced" | "mbaff" | "paff" => Some(ScanType::Interlaced),
        _ => None,
    }
}

/// A field order (TFF/BFF) implies interlacing; "Progressive" denies it.
fn parse_scan_order(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_uppercase().as_str() {
        "TFF" | "BFF" | "TOP FIELD FIRST" | "BOTTOM FIELD FIRST" => Some(true),
        "PROGRESSIVE" => Some(false),
        _ => None,
    }
}
