// Metadata Resolver - discovers selectable resolutions for a link

use std::sync::Arc;

use super::errors::GrabError;
use super::models::{ResolutionCatalog, StreamOption};
use super::traits::MediaExtractor;

/// Turns a pasted link into an ordered catalog of selectable resolutions.
///
/// One metadata query, single attempt, fail fast. No disk writes, no state
/// outside the returned catalog.
pub struct MetadataResolver {
    extractor: Arc<dyn MediaExtractor>,
}

impl MetadataResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    /// Resolve the encodings available for `reference`.
    ///
    /// Keeps formats that declare a height and a video codec other than
    /// `"none"` (audio-only streams are dropped), in the extractor's native
    /// order and without deduplicating by height. An empty filtered list
    /// yields a single sentinel entry, so a successful resolve never returns
    /// an empty catalog.
    pub async fn resolve(&self, reference: &str) -> Result<ResolutionCatalog, GrabError> {
        if reference.trim().is_empty() {
            return Err(GrabError::InvalidInput);
        }

        let info = self
            .extractor
            .query_metadata(reference, false)
            .await
            .map_err(|e| GrabError::Resolve(e.to_string()))?;

        let mut options: Vec<StreamOption> = info
            .formats
            .iter()
            .filter(|f| f.height.is_some() && f.vcodec.as_deref().is_some_and(|v| v != "none"))
            .map(|f| StreamOption::stream(f.format_id.clone(), f.height.unwrap_or(0)))
            .collect();

        if options.is_empty() {
            eprintln!("[Resolver] No video resolutions for {}", reference);
            options.push(StreamOption::NoResolutions);
        }

        Ok(ResolutionCatalog::new(reference, options))
    }
}
