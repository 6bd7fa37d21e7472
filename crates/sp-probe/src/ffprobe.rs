//! FFprobe-based media probing.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use sp_core::{Error, Result, ScanType};

use crate::prober::Prober;
use crate::types::{AudioTrack, MediaInfo, VideoTrack};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    field_order: Option<String>,
    channels: Option<u32>,
    #[serde(default)]
    disposition: FfprobeDisposition,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeDisposition {
    #[serde(default)]
    default: u8,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
}

/// Prober backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
}

impl FfprobeProber {
    /// Use `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("ffprobe")
    }

    /// Use a specific ffprobe executable.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn supports(&self, path: &Path) -> bool {
        sp_core::paths::is_video_file(path)
    }

    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool("ffprobe", "not found in PATH")
                } else {
                    Error::from(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool("ffprobe", stderr.trim().to_string()));
        }

        let json = String::from_utf8(output.stdout)
            .map_err(|e| Error::tool("ffprobe", format!("invalid UTF-8: {e}")))?;
        parse_ffprobe_json(path, &json)
    }
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_ffprobe_json(path: &Path, json: &str) -> Result<MediaInfo> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::Probe(format!("ffprobe output: {e}")))?;

    let (container, duration) = match output.format {
        Some(format) => (
            format.format_name.unwrap_or_default(),
            format
                .duration
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(Duration::from_secs_f64),
        ),
        None => (String::new(), None),
    };

    let mut info = MediaInfo {
        file_path: path.to_path_buf(),
        container,
        duration,
        ..Default::default()
    };

    for stream in output.streams {
        match stream.codec_type.as_deref() {
            Some("video") => {
                let (scan_type, interlaced) = field_order(stream.field_order.as_deref());
                info.video_tracks.push(VideoTrack {
                    index: info.video_tracks.len() as u32,
                    codec: stream.codec_name.unwrap_or_default(),
                    width: stream.width.unwrap_or(0),
                    height: stream.height.unwrap_or(0),
                    scan_type,
                    interlaced,
                    default: stream.disposition.default == 1,
                });
            }
            Some("audio") => {
                info.audio_tracks.push(AudioTrack {
                    index: info.audio_tracks.len() as u32,
                    codec: stream.codec_name.unwrap_or_default(),
                    channels: stream.channels.unwrap_or(2),
                    language: stream.tags.language,
                    default: stream.disposition.default == 1,
                });
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Map ffprobe's `field_order` to a scan type.
///
/// `progressive` is a definite answer. The field orders (`tt`, `bb`, `tb`,
/// `bt`) say the stream is interlaced but only as a secondary signal.
fn field_order(value: Option<&str>) -> (Option<ScanType>, Option<bool>) {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("progressive") => (Some(ScanType::Progressive), Some(false)),
        Some("tt" | "bb" | "tb" | "bt") => (None, Some(true)),
        _ => (None, None),
    }
}
