//! Resolution discovery and download orchestration for a yt-dlp shell.
//!
//! The presentation layer supplies a link, renders the resolved catalog,
//! and calls [`DownloadOrchestrator::download`] with the user's pick; the
//! actual extraction and container merging are delegated to the
//! [`MediaExtractor`] collaborator (in production, [`ytdlp::YtDlpExtractor`]).

pub mod downloader;
pub mod ytdlp;

pub use downloader::{
    DownloadOptions, DownloadOrchestrator, DownloadOutcome, DownloadSpec, ExtractorConfig,
    ExtractorError, FfmpegLocation, GrabError, MediaExtractor, MediaInfo, MetadataResolver,
    RawFormat, ResolutionCatalog, Session, SizeEstimate, StreamOption, ToolStatus,
};
pub use ytdlp::YtDlpExtractor;
