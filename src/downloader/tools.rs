// External tool discovery: yt-dlp binary and ffmpeg merge tool

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where the ffmpeg merge tool is expected to live.
///
/// Recognized options per configuration: an explicit override path, or a
/// search across the standard install locations and `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FfmpegLocation {
    #[default]
    Autodetect,
    Override(PathBuf),
}

impl FfmpegLocation {
    /// Resolve to a concrete path, `None` when nothing is found.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Self::Override(path) => Some(path.clone()),
            Self::Autodetect => locate_binary("ffmpeg"),
        }
    }
}

/// Find a binary in the standard install locations, then `PATH`.
pub fn locate_binary(name: &str) -> Option<PathBuf> {
    let common_paths = [
        format!("/opt/homebrew/bin/{}", name), // Homebrew on Apple Silicon
        format!("/usr/local/bin/{}", name),    // Homebrew on Intel Mac
        format!("/usr/bin/{}", name),          // System installation
    ];

    for path in common_paths {
        if Path::new(&path).exists() {
            return Some(PathBuf::from(path));
        }
    }

    if let Ok(output) = Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
    }

    None
}

/// Availability report for one external tool, for shell display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub is_available: bool,
}

/// Probe one tool by name.
pub fn tool_status(name: &str) -> ToolStatus {
    let path = locate_binary(name);
    let version = path.as_deref().and_then(probe_version);

    ToolStatus {
        name: name.to_string(),
        is_available: path.is_some(),
        path,
        version,
    }
}

/// Status of the two tools this crate shells out to.
pub fn required_tools() -> Vec<ToolStatus> {
    vec![tool_status("yt-dlp"), tool_status("ffmpeg")]
}

fn probe_version(path: &Path) -> Option<String> {
    match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // ffmpeg prints a banner; the first line is enough
            let out = String::from_utf8_lossy(&output.stdout);
            out.lines().next().map(|l| l.trim().to_string())
        }
        _ => None,
    }
}
