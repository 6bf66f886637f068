//! Context block shared by every level's prompt.
//!
//! Scanning failures never abort a request: they become a line of text in the
//! context, the same way a failed generation becomes that level's text.

use learnsor_core::config::ScanConfig;
use learnsor_scan::{scan_project, summarize_file};
use std::path::Path;

/// Join the optional project overview, optional active-file summary, and the
/// learner's code into one block, in that order.
pub fn assemble_context(
    project: Option<&str>,
    active_file: Option<&str>,
    user_code: &str,
) -> String {
    let mut sections = Vec::new();

    if let Some(project) = project.map(str::trim).filter(|s| !s.is_empty()) {
        sections.push(format!("PROJECT OVERVIEW:\n{}", project));
    }
    if let Some(active) = active_file.map(str::trim).filter(|s| !s.is_empty()) {
        sections.push(format!("ACTIVE FILE:\n{}", active));
    }

    let code = user_code.trim_end();
    let code = if code.trim().is_empty() {
        "(no code yet)"
    } else {
        code
    };
    sections.push(format!("CURRENT CODE:\n{}", code));

    sections.join("\n\n")
}

/// Project overview text, or the scan error as text.
pub fn project_context(root: &Path, config: &ScanConfig) -> String {
    match scan_project(root, config) {
        Ok(summary) => summary.render(),
        Err(e) => {
            tracing::warn!("project scan failed: {}", e);
            format!("Error scanning project {}: {}", root.display(), e)
        }
    }
}

/// Active-file summary text, or the read error as text.
pub fn active_file_context(path: &Path, config: &ScanConfig) -> String {
    match summarize_file(path, config) {
        Ok(summary) => summary.render(),
        Err(e) => {
            tracing::warn!("active file summary failed: {}", e);
            format!("Error reading active file {}: {}", path.display(), e)
        }
    }
}
