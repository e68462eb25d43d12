// MediaExtractor trait and the wire-level metadata types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::errors::ExtractorError;
use super::tools::FfmpegLocation;

/// Raw stream entry as reported by the extractor.
///
/// Attributes are carried through untouched; absent fields stay `None` and
/// are never synthesized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    pub ext: String,
    /// Video height in pixels, absent for audio-only streams
    pub height: Option<u32>,
    /// Video codec; the literal `"none"` marks an audio-only stream
    pub vcodec: Option<String>,
    /// Audio codec; the literal `"none"` marks a video-only stream
    pub acodec: Option<String>,
    pub filesize: Option<u64>,
}

/// Metadata for a single (non-playlist) item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    pub formats: Vec<RawFormat>,
    /// Best-effort byte size; `None` when the extractor does not report one
    pub filesize: Option<u64>,
}

/// What the orchestrator asks the extractor to fetch and merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    /// yt-dlp format selection, e.g. `"137+bestaudio"`
    pub format: String,

    /// Directory the merged file lands in
    pub output_dir: PathBuf,

    /// Output filename template, e.g. `"%(title)s.%(ext)s"`
    pub output_template: String,

    /// Container the merge is forced into when streams arrive separately
    pub merge_container: String,
}

/// Configuration for an extractor implementation.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,

    /// Timeout for metadata queries, in seconds
    pub timeout_seconds: u64,

    /// Where the merge tool lives
    pub ffmpeg: FfmpegLocation,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_seconds: 30,
            ffmpeg: FfmpegLocation::Autodetect,
        }
    }
}

impl ExtractorConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_ffmpeg(mut self, location: FfmpegLocation) -> Self {
        self.ffmpeg = location;
        self
    }
}

/// The extraction collaborator seam.
///
/// Both calls are black boxes from the orchestration core's perspective: one
/// outbound metadata query, one blocking fetch-and-merge. Partial artifacts
/// left behind by a failed merge are the implementation's cleanup concern.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Query metadata for a single item without fetching any media bytes.
    ///
    /// `flat` requests the cheaper metadata-only extraction used by the size
    /// probe.
    async fn query_metadata(
        &self,
        reference: &str,
        flat: bool,
    ) -> Result<MediaInfo, ExtractorError>;

    /// Fetch the requested format plus best audio and merge them into one
    /// file under `spec.output_dir`. Returns the merged file's path.
    async fn fetch_and_merge(
        &self,
        reference: &str,
        spec: &DownloadSpec,
    ) -> Result<PathBuf, ExtractorError>;
}
