// yt-dlp extraction collaborator
//
// Shells out to the native `yt-dlp` binary: `--dump-json` for metadata and a
// single fetch-and-merge invocation for downloads. All network transfer and
// container merging happens inside yt-dlp/ffmpeg; this module only builds
// argument vectors and parses what comes back.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

use crate::downloader::errors::ExtractorError;
use crate::downloader::tools::locate_binary;
use crate::downloader::traits::{
    DownloadSpec, ExtractorConfig, MediaExtractor, MediaInfo, RawFormat,
};
use crate::downloader::utils::run_output_with_timeout;

lazy_static! {
    static ref MERGE_RE: Regex =
        Regex::new(r#"\[Merger\] Merging formats into "(.+)""#).unwrap();
    static ref DEST_RE: Regex = Regex::new(r"\[download\] Destination: (.+)").unwrap();
    static ref ALREADY_RE: Regex =
        Regex::new(r"\[download\] (.+) has already been downloaded").unwrap();
}

/// CLI-based extractor using the yt-dlp binary.
pub struct YtDlpExtractor {
    ytdlp_path: String,
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        let ytdlp_path = locate_binary("yt-dlp")
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "yt-dlp".to_string());
        Self { ytdlp_path, config }
    }

    fn metadata_args(&self, reference: &str, flat: bool) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.timeout_seconds.to_string(),
        ];

        if flat {
            // Metadata only, no recursive resolution (the size probe)
            args.push("--flat-playlist".to_string());
        }

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(reference.to_string());
        args
    }

    fn download_args(&self, reference: &str, spec: &DownloadSpec) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            spec.format.clone(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "-P".to_string(),
            spec.output_dir.to_string_lossy().to_string(),
            // Default yt-dlp template appends [id]; name by title only
            "-o".to_string(),
            spec.output_template.clone(),
            "--merge-output-format".to_string(),
            spec.merge_container.clone(),
        ];

        if let Some(ffmpeg) = self.config.ffmpeg.resolve() {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().to_string());
        }

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(reference.to_string());
        args
    }

    fn parse_metadata(stdout: &[u8]) -> Result<MediaInfo, ExtractorError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ExtractorError::Parse(format!("Invalid JSON: {}", e)))?;

        let formats = json["formats"]
            .as_array()
            .map(|formats| {
                formats
                    .iter()
                    .map(|f| RawFormat {
                        format_id: f["format_id"].as_str().unwrap_or("").to_string(),
                        ext: f["ext"].as_str().unwrap_or("").to_string(),
                        height: f["height"].as_u64().map(|h| h as u32),
                        vcodec: f["vcodec"].as_str().map(|s| s.to_string()),
                        acodec: f["acodec"].as_str().map(|s| s.to_string()),
                        filesize: f["filesize"]
                            .as_u64()
                            .or_else(|| f["filesize_approx"].as_u64()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(MediaInfo {
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            formats,
            filesize: json["filesize"]
                .as_u64()
                .or_else(|| json["filesize_approx"].as_u64()),
        })
    }

    /// Recover the merged file's path from yt-dlp's stdout.
    ///
    /// The merger line wins (it names the final container); otherwise the
    /// last destination line, otherwise an already-downloaded notice.
    fn parse_output_path(stdout: &str) -> Option<PathBuf> {
        if let Some(caps) = MERGE_RE.captures_iter(stdout).last() {
            return Some(PathBuf::from(&caps[1]));
        }
        if let Some(caps) = DEST_RE.captures_iter(stdout).last() {
            return Some(PathBuf::from(&caps[1]));
        }
        ALREADY_RE
            .captures_iter(stdout)
            .last()
            .map(|caps| PathBuf::from(&caps[1]))
    }

    fn failure_message(stderr: &[u8]) -> String {
        let stderr = String::from_utf8_lossy(stderr);
        let trimmed = stderr.trim();
        if trimmed.is_empty() {
            "yt-dlp exited with an error".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn query_metadata(
        &self,
        reference: &str,
        flat: bool,
    ) -> Result<MediaInfo, ExtractorError> {
        let args = self.metadata_args(reference, flat);
        let output =
            run_output_with_timeout(&self.ytdlp_path, &args, self.config.timeout_seconds).await?;

        if !output.status.success() {
            return Err(ExtractorError::ExecutionFailed(Self::failure_message(
                &output.stderr,
            )));
        }

        Self::parse_metadata(&output.stdout)
    }

    async fn fetch_and_merge(
        &self,
        reference: &str,
        spec: &DownloadSpec,
    ) -> Result<PathBuf, ExtractorError> {
        let args = self.download_args(reference, spec);
        eprintln!("[yt-dlp] {} {}", self.ytdlp_path, args.join(" "));

        // Blocking from the caller's perspective; no timeout on the transfer
        let output = tokio::process::Command::new(&self.ytdlp_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::ToolNotFound(self.ytdlp_path.clone())
                } else {
                    ExtractorError::ExecutionFailed(format!("Failed to start yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            return Err(ExtractorError::ExecutionFailed(Self::failure_message(
                &output.stderr,
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::parse_output_path(&stdout).unwrap_or_else(|| spec.output_dir.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::tools::FfmpegLocation;

    const METADATA_JSON: &str = r#"{
        "title": "Test Video",
        "filesize": 104857600,
        "formats": [
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2"},
            {"format_id": "22", "ext": "mp4", "height": 720, "vcodec": "avc1.64001F", "acodec": "mp4a.40.2", "filesize": 52428800},
            {"format_id": "137", "ext": "mp4", "height": 1080, "vcodec": "avc1.640028", "acodec": "none", "filesize_approx": 78643200}
        ]
    }"#;

    #[test]
    fn test_parse_metadata_carries_attributes_through() {
        let info = YtDlpExtractor::parse_metadata(METADATA_JSON.as_bytes()).unwrap();
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.filesize, Some(104_857_600));
        assert_eq!(info.formats.len(), 3);

        let audio = &info.formats[0];
        assert_eq!(audio.vcodec.as_deref(), Some("none"));
        assert_eq!(audio.height, None);

        let video = &info.formats[2];
        assert_eq!(video.format_id, "137");
        assert_eq!(video.height, Some(1080));
        assert_eq!(video.filesize, Some(78_643_200));
    }

    #[test]
    fn test_parse_metadata_without_filesize() {
        let info =
            YtDlpExtractor::parse_metadata(br#"{"title": "T", "formats": []}"#).unwrap();
        assert_eq!(info.filesize, None);
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_parse_metadata_rejects_garbage() {
        let err = YtDlpExtractor::parse_metadata(b"not json").unwrap_err();
        assert!(matches!(err, ExtractorError::Parse(_)));
    }

    #[test]
    fn test_merger_line_wins_over_destinations() {
        let stdout = "\
[download] Destination: /tmp/Test Video.f137.mp4\n\
[download] Destination: /tmp/Test Video.f140.m4a\n\
[Merger] Merging formats into \"/tmp/Test Video.mp4\"\n";
        assert_eq!(
            YtDlpExtractor::parse_output_path(stdout),
            Some(PathBuf::from("/tmp/Test Video.mp4"))
        );
    }

    #[test]
    fn test_last_destination_is_fallback() {
        let stdout = "[download] Destination: /tmp/Test Video.mp4\n[download] 100%\n";
        assert_eq!(
            YtDlpExtractor::parse_output_path(stdout),
            Some(PathBuf::from("/tmp/Test Video.mp4"))
        );
        assert_eq!(YtDlpExtractor::parse_output_path("no markers here"), None);
    }

    #[test]
    fn test_flat_mode_adds_flat_playlist_flag() {
        let extractor = YtDlpExtractor::new();
        let flat = extractor.metadata_args("https://youtu.be/abc", true);
        let full = extractor.metadata_args("https://youtu.be/abc", false);

        assert!(flat.contains(&"--flat-playlist".to_string()));
        assert!(!full.contains(&"--flat-playlist".to_string()));
        // Both are single-item queries
        assert!(flat.contains(&"--no-playlist".to_string()));
        assert!(full.contains(&"--no-playlist".to_string()));
    }

    #[test]
    fn test_download_args_request_merge_and_template() {
        let config = ExtractorConfig::default()
            .with_ffmpeg(FfmpegLocation::Override(PathBuf::from("/custom/ffmpeg")));
        let extractor = YtDlpExtractor::with_config(config);

        let spec = DownloadSpec {
            format: "137+bestaudio".to_string(),
            output_dir: PathBuf::from("/downloads/YouTube Downloads"),
            output_template: "%(title)s.%(ext)s".to_string(),
            merge_container: "mp4".to_string(),
        };
        let args = extractor.download_args("https://youtu.be/abc", &spec);

        let joined = args.join(" ");
        assert!(joined.contains("-f 137+bestaudio"));
        assert!(joined.contains("--merge-output-format mp4"));
        assert!(joined.contains("-o %(title)s.%(ext)s"));
        assert!(joined.contains("--ffmpeg-location /custom/ffmpeg"));
        assert!(joined.contains("--no-playlist"));
        assert_eq!(args.last(), Some(&"https://youtu.be/abc".to_string()));
    }
}
