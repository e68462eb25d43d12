// Download Orchestrator - confirmed fetch-and-merge of a chosen resolution

use std::path::PathBuf;
use std::sync::Arc;

use super::errors::GrabError;
use super::models::{
    DownloadOptions, DownloadOutcome, ResolutionCatalog, SizeEstimate, StreamOption,
};
use super::traits::{DownloadSpec, MediaExtractor};
use super::utils::bytes_to_megabytes;

/// Drives one download: precondition checks, size confirmation, destination
/// ensure, and a single fetch-and-merge call.
///
/// Preconditions are re-validated here rather than trusting a prior resolve;
/// the catalog the caller passes is a snapshot taken at invocation (see
/// `Session::snapshot`). Once the fetch-and-merge call is in flight there is
/// no cancellation, and partial artifacts from a failed merge are the
/// extractor's cleanup concern.
pub struct DownloadOrchestrator {
    extractor: Arc<dyn MediaExtractor>,
    options: DownloadOptions,
}

impl DownloadOrchestrator {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self {
            extractor,
            options: DownloadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    /// Download `selection` for `reference`, merged with best audio.
    ///
    /// `confirm` is the shell's synchronous yes/no prompt; it receives the
    /// best-effort size estimate and a `false` terminates the operation with
    /// `DownloadOutcome::Cancelled` before any filesystem activity.
    pub async fn download<F>(
        &self,
        reference: &str,
        selection: &StreamOption,
        catalog: &ResolutionCatalog,
        confirm: F,
    ) -> Result<DownloadOutcome, GrabError>
    where
        F: FnOnce(&SizeEstimate) -> bool,
    {
        if reference.trim().is_empty() {
            return Err(GrabError::InvalidInput);
        }

        let format_id = match selection.format_id() {
            Some(id) if !catalog.is_empty() => id,
            _ => return Err(GrabError::NoSelection),
        };

        // Cheap flat probe for the confirmation prompt; a missing size is
        // surfaced as the literal Unknown, never as zero.
        let info = self
            .extractor
            .query_metadata(reference, true)
            .await
            .map_err(|e| GrabError::Download(e.to_string()))?;

        let estimate = match info.filesize {
            Some(bytes) => SizeEstimate::Megabytes(bytes_to_megabytes(bytes)),
            None => SizeEstimate::Unknown,
        };

        if !confirm(&estimate) {
            eprintln!("[Orchestrator] Download declined for {}", reference);
            return Ok(DownloadOutcome::Cancelled);
        }

        let output_dir = self.output_dir()?;
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| GrabError::Download(format!("Failed to create {:?}: {}", output_dir, e)))?;

        let spec = DownloadSpec {
            format: format!("{}+bestaudio", format_id),
            output_dir,
            output_template: "%(title)s.%(ext)s".to_string(),
            merge_container: self.options.merge_container.clone(),
        };

        eprintln!(
            "[Orchestrator] Fetching {} as {} via {}",
            reference,
            spec.format,
            self.extractor.name()
        );

        let output_path = self
            .extractor
            .fetch_and_merge(reference, &spec)
            .await
            .map_err(|e| GrabError::Download(e.to_string()))?;

        Ok(DownloadOutcome::Completed { output_path })
    }

    /// `<output root>/<subfolder>`, root defaulting to `<home>/Downloads`.
    fn output_dir(&self) -> Result<PathBuf, GrabError> {
        let root = match &self.options.output_root {
            Some(root) => root.clone(),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    GrabError::Download("Could not determine the home directory".to_string())
                })?
                .join("Downloads"),
        };
        Ok(root.join(&self.options.subfolder))
    }
}
