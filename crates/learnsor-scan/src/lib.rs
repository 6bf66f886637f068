//! Static-text scanning of a learner's project.
//!
//! Produces short textual summaries (imports, top-level declarations, TODO
//! markers, previews) that are pasted into hint prompts. Regex heuristics only;
//! nothing here is parsed back by the merge engine.

pub mod error;
pub mod project;
pub mod summary;

pub use error::ScanError;
pub use project::{ProjectSummary, scan_project};
pub use summary::{FileSummary, TodoMarker, summarize_file, summarize_source};
