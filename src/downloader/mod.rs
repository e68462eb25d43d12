// Resolution discovery and download orchestration

pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod tools;
pub mod traits;
pub mod utils;

pub use errors::{ExtractorError, GrabError};
pub use models::{
    DownloadOptions, DownloadOutcome, ResolutionCatalog, Session, SizeEstimate, StreamOption,
};
pub use orchestrator::DownloadOrchestrator;
pub use resolver::MetadataResolver;
pub use tools::{FfmpegLocation, ToolStatus};
pub use traits::{DownloadSpec, ExtractorConfig, MediaExtractor, MediaInfo, RawFormat};
