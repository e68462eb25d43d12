// Common data models for the resolve/download flow

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Label the shell shows before any catalog has been loaded
pub const PLACEHOLDER_LABEL: &str = "Select Resolution";

/// Label of the sentinel entry substituted when no resolutions qualify
pub const NO_RESOLUTIONS_LABEL: &str = "No Resolutions Found";

/// One selectable entry of a `ResolutionCatalog`.
///
/// Real streams carry the format id and height exactly as the extractor
/// reported them. The placeholder and the "no resolutions" sentinel are
/// representable so the orchestrator can reject them as non-targets instead
/// of sending their labels downstream as format ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamOption {
    /// A downloadable encoding reported by the extractor
    Stream { format_id: String, height: u32 },

    /// "Select Resolution" - nothing picked yet
    Placeholder,

    /// "No Resolutions Found" - resolve succeeded but nothing qualified
    NoResolutions,
}

impl StreamOption {
    pub fn stream(format_id: impl Into<String>, height: u32) -> Self {
        Self::Stream {
            format_id: format_id.into(),
            height,
        }
    }

    /// Display form, e.g. `"137 (1080p)"`.
    pub fn display_label(&self) -> String {
        match self {
            Self::Stream { format_id, height } => format!("{} ({}p)", format_id, height),
            Self::Placeholder => PLACEHOLDER_LABEL.to_string(),
            Self::NoResolutions => NO_RESOLUTIONS_LABEL.to_string(),
        }
    }

    /// Inverse of `display_label` for shells that hand back plain strings.
    ///
    /// The format id is the token preceding the parenthetical suffix; the two
    /// special labels map back to their non-selectable shapes.
    pub fn parse_label(label: &str) -> Self {
        match label {
            PLACEHOLDER_LABEL => return Self::Placeholder,
            NO_RESOLUTIONS_LABEL => return Self::NoResolutions,
            _ => {}
        }

        let format_id = label.split(' ').next().unwrap_or(label).to_string();
        let height = label
            .split('(')
            .nth(1)
            .and_then(|s| s.trim_end_matches(')').trim_end_matches('p').parse().ok())
            .unwrap_or(0);

        Self::Stream { format_id, height }
    }

    /// Format id for download, `None` for the placeholder/sentinel.
    pub fn format_id(&self) -> Option<&str> {
        match self {
            Self::Stream { format_id, .. } => Some(format_id),
            _ => None,
        }
    }

    /// Whether this entry is a valid download target.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Stream { .. })
    }
}

impl fmt::Display for StreamOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// Ordered, non-deduplicated list of selectable encodings for one reference.
///
/// Insertion order is the extractor's native order. Produced fresh by every
/// resolve; a new catalog replaces the previous one, never merges into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionCatalog {
    reference: String,
    options: Vec<StreamOption>,
}

impl ResolutionCatalog {
    pub fn new(reference: impl Into<String>, options: Vec<StreamOption>) -> Self {
        Self {
            reference: reference.into(),
            options,
        }
    }

    /// The link this catalog was resolved from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn options(&self) -> &[StreamOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Whether the catalog holds at least one real stream (not just the
    /// sentinel entry).
    pub fn has_streams(&self) -> bool {
        self.options.iter().any(StreamOption::is_selectable)
    }

    /// Labels in catalog order, for a dropdown.
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(StreamOption::display_label).collect()
    }
}

/// Session state owned by the presentation shell.
///
/// Replaces the original app's process-wide globals. Each installed catalog
/// bumps the generation tag, and `snapshot` hands out an owned copy, so a
/// resolve landing mid-download can never swap the list under the
/// orchestrator.
#[derive(Debug, Default)]
pub struct Session {
    catalog: Option<ResolutionCatalog>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly resolved catalog, replacing any prior one.
    pub fn install(&mut self, catalog: ResolutionCatalog) -> &ResolutionCatalog {
        self.generation += 1;
        self.catalog.insert(catalog)
    }

    /// Owned copy of the current catalog, taken at download invocation time.
    pub fn snapshot(&self) -> Option<ResolutionCatalog> {
        self.catalog.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.catalog = None;
    }
}

/// Best-effort size shown in the confirmation prompt.
///
/// A missing size is the literal `Unknown`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SizeEstimate {
    /// Size in megabytes, rounded to 2 decimal places
    Megabytes(f64),
    Unknown,
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Megabytes(mb) => write!(f, "{} MB", mb),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Outcome of a download call. A declined confirmation terminates the
/// operation successfully, with no side effects performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed { output_path: PathBuf },
    Cancelled,
}

/// Where and how the merged file is written.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Root under which the subfolder is created; `None` means
    /// `<home>/Downloads`
    pub output_root: Option<PathBuf>,

    /// App-specific subfolder under the root
    pub subfolder: String,

    /// Container the merge is forced into when video and audio arrive as
    /// separate streams
    pub merge_container: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_root: None,
            subfolder: "YouTube Downloads".to_string(),
            merge_container: "mp4".to_string(),
        }
    }
}

impl DownloadOptions {
    pub fn with_output_root(mut self, root: PathBuf) -> Self {
        self.output_root = Some(root);
        self
    }

    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = subfolder.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let option = StreamOption::stream("137", 1080);
        let label = option.display_label();
        assert_eq!(label, "137 (1080p)");

        let parsed = StreamOption::parse_label(&label);
        assert_eq!(parsed.format_id(), Some("137"));
        assert_eq!(parsed, option);
    }

    #[test]
    fn test_format_id_survives_suffix_stripping() {
        // Ids must come back byte-identical, only the parenthetical goes
        let option = StreamOption::stream("22-dash", 720);
        let parsed = StreamOption::parse_label(&option.display_label());
        assert_eq!(parsed.format_id(), Some("22-dash"));
    }

    #[test]
    fn test_special_labels_parse_to_non_targets() {
        assert_eq!(
            StreamOption::parse_label(PLACEHOLDER_LABEL),
            StreamOption::Placeholder
        );
        assert_eq!(
            StreamOption::parse_label(NO_RESOLUTIONS_LABEL),
            StreamOption::NoResolutions
        );
        assert!(StreamOption::parse_label(NO_RESOLUTIONS_LABEL)
            .format_id()
            .is_none());
    }

    #[test]
    fn test_catalog_keeps_duplicate_heights_distinct() {
        let catalog = ResolutionCatalog::new(
            "https://example.com/v",
            vec![
                StreamOption::stream("137", 1080),
                StreamOption::stream("248", 1080),
            ],
        );
        assert_eq!(catalog.options().len(), 2);
        assert_eq!(catalog.labels(), vec!["137 (1080p)", "248 (1080p)"]);
    }

    #[test]
    fn test_sentinel_catalog_has_no_streams() {
        let catalog =
            ResolutionCatalog::new("url", vec![StreamOption::NoResolutions]);
        assert!(!catalog.is_empty());
        assert!(!catalog.has_streams());
    }

    #[test]
    fn test_session_generation_bumps_on_install() {
        let mut session = Session::new();
        assert_eq!(session.generation(), 0);
        assert!(session.snapshot().is_none());

        session.install(ResolutionCatalog::new(
            "url",
            vec![StreamOption::stream("18", 360)],
        ));
        assert_eq!(session.generation(), 1);

        let snapshot = session.snapshot().unwrap();

        // A later resolve replaces the catalog but not the snapshot
        session.install(ResolutionCatalog::new(
            "url2",
            vec![StreamOption::stream("22", 720)],
        ));
        assert_eq!(session.generation(), 2);
        assert_eq!(snapshot.reference(), "url");
    }

    #[test]
    fn test_size_estimate_display() {
        assert_eq!(SizeEstimate::Unknown.to_string(), "Unknown");
        assert_eq!(SizeEstimate::Megabytes(100.0).to_string(), "100 MB");
    }
}
