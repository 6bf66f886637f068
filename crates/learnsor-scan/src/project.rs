//! Project-wide scan: walk the tree, summarize recognized source files.

use crate::error::ScanError;
use crate::summary::{FileSummary, summarize_file};
use globset::{Glob, GlobSet, GlobSetBuilder};
use learnsor_core::config::ScanConfig;
use learnsor_core::language::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Summaries of the source files in a project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub root: PathBuf,
    /// Summarized files, sorted by relative path.
    pub files: Vec<FileSummary>,
    /// Recognized files left out because of `max_files`.
    pub truncated: usize,
    /// Paths the walk could not read, plus files that could not be read or were too large.
    pub skipped: usize,
}

fn build_exclude_set(patterns: &[String]) -> Result<Option<GlobSet>, ScanError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map(Some).map_err(|e| ScanError::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Yield the readable walk entries, logging and counting the rest.
fn readable_entries<T, E: std::fmt::Display>(
    entries: impl Iterator<Item = Result<T, E>>,
    unreadable: &mut usize,
) -> impl Iterator<Item = T> {
    entries.filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!("skipping unreadable path: {}", e);
            *unreadable += 1;
            None
        }
    })
}

/// Collect relative paths of recognized source files, sorted, plus the
/// number of paths the walk could not read.
fn collect_source_files(root: &Path, exclude: Option<&GlobSet>) -> (Vec<PathBuf>, usize) {
    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .add_custom_ignore_filename(".learnsorignore")
        .build();

    let mut unreadable = 0;
    let mut files: Vec<PathBuf> = readable_entries(walker, &mut unreadable)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str())?;
            Language::from_extension(ext)?;
            let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            if exclude.is_some_and(|set| set.is_match(&rel)) {
                return None;
            }
            Some(rel)
        })
        .collect();
    files.sort();
    (files, unreadable)
}

/// Walk a project and summarize up to `max_files` source files.
///
/// Hidden files, `.gitignore`d paths, `.learnsorignore`d paths, and the
/// configured exclude globs are skipped. Unreadable paths are counted, not fatal.
pub fn scan_project(root: &Path, config: &ScanConfig) -> Result<ProjectSummary, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let exclude = build_exclude_set(&config.exclude)?;
    let (candidates, mut skipped) = collect_source_files(root, exclude.as_ref());
    let truncated = candidates.len().saturating_sub(config.max_files);

    let mut files = Vec::new();
    for rel in candidates.into_iter().take(config.max_files) {
        match summarize_file(&root.join(&rel), config) {
            Ok(mut summary) => {
                summary.path = rel;
                files.push(summary);
            }
            Err(e) => {
                tracing::warn!("skipping {}: {}", rel.display(), e);
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "scanned {}: {} files summarized, {} truncated, {} skipped",
        root.display(),
        files.len(),
        truncated,
        skipped
    );

    Ok(ProjectSummary {
        root: root.to_path_buf(),
        files,
        truncated,
        skipped,
    })
}

impl ProjectSummary {
    /// File counts per language name.
    pub fn language_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            *counts.entry(file.language.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    fn project_name(&self) -> String {
        self.root
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(&self.root)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string()
    }

    /// Render the overview as prompt text.
    pub fn render(&self) -> String {
        if self.files.is_empty() {
            return format!("Project {}: no source files found.\n", self.project_name());
        }

        let languages: Vec<String> = self
            .language_counts()
            .iter()
            .map(|(name, count)| format!("{} {}", name, count))
            .collect();
        let mut out = format!(
            "Project {} ({} source files; {})\n\n",
            self.project_name(),
            self.files.len() + self.truncated,
            languages.join(", ")
        );
        for file in &self.files {
            out.push_str(&file.render());
        }
        if self.truncated > 0 {
            out.push_str(&format!("... and {} more files\n", self.truncated));
        }
        out
    }
}
