//! External tool detection.

use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use sp_core::{Error, Result};

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the tool's version output.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use sp_probe::check_tool;
///
/// let info = check_tool("mediainfo", "--Version");
/// if info.available {
///     println!("mediainfo: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, version_arg: &str) -> ToolInfo {
    let Ok(path) = which::which(name) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    let version = Command::new(&path)
        .arg(version_arg)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
        });

    ToolInfo {
        name: name.to_string(),
        available: true,
        version,
        path: Some(path),
    }
}

/// Check the tools used by the probe backends.
pub fn check_tools() -> Vec<ToolInfo> {
    vec![check_tool("ffprobe", "-version"), check_tool("mediainfo", "--Version")]
}

/// Require that a tool is available, returning its path.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool(name, "not found in PATH"))
}
