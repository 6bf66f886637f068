//! Single-file summaries: imports, top-level declarations, TODO markers, preview.
//!
//! Uses regex heuristics, not a parser. Good enough to tell the tutor what a file
//! is about; comments and strings may produce false matches.

use crate::error::ScanError;
use learnsor_core::config::ScanConfig;
use learnsor_core::language::Language;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const MAX_IMPORTS: usize = 12;
const MAX_DECLARATIONS: usize = 20;
const MAX_TODOS: usize = 10;
const MAX_PREVIEW_WIDTH: usize = 120;

/// A TODO-style marker found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoMarker {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

/// What a file looks like from the outside.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub language: Language,
    pub line_count: usize,
    pub imports: Vec<String>,
    pub declarations: Vec<String>,
    pub todos: Vec<TodoMarker>,
    pub preview: Vec<String>,
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^\s*(?:import\s+\S|from\s+\S+\s+import\b|#\s*include\b|use\s+[\w:{]|using\s+[\w.]+\s*;|require(?:_relative)?[\s(]|(?:const|let|var)\s+\{?[\w\s,]+\}?\s*=\s*require\(|package\s+\w|source\s+[\w./~$"'])"#,
        )
        .expect("valid import regex")
    })
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?:pub(?:\([^)]*\))?|export(?:\s+default)?|public|private|protected|internal|static|abstract|final|sealed|open|data|async|unsafe|inline)\s+)*(?:def|class|fn|function|struct|enum|trait|impl|interface|type|func|module|object|mod|record|fun)\b\s*[A-Za-z_<]",
        )
        .expect("valid declaration regex")
    })
}

fn c_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:static\s+|inline\s+|const\s+)*(?:void|int|char|float|double|bool|long|short|unsigned|auto|size_t|std::\w+(?:<[^>]*>)?)\s+\**[A-Za-z_]\w*\s*\([^;]*$",
        )
        .expect("valid function regex")
    })
}

fn shell_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][\w-]*\s*\(\)\s*\{?").expect("valid shell regex"))
}

fn todo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(TODO|FIXME|XXX|HACK)\b[:\s]*(.*)").expect("valid todo regex")
    })
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        line.to_string()
    } else {
        let cut: String = line.chars().take(width).collect();
        format!("{cut}...")
    }
}

/// Strip a declaration down to its signature line.
fn clean_declaration(line: &str) -> String {
    let trimmed = line
        .trim_end()
        .trim_end_matches('{')
        .trim_end_matches(':')
        .trim_end();
    truncate(trimmed, MAX_PREVIEW_WIDTH)
}

fn is_declaration(line: &str, language: &Language) -> bool {
    // Top-level only: indented lines belong to some enclosing scope.
    if line.starts_with([' ', '\t']) {
        return false;
    }
    match language {
        Language::C | Language::Cpp => {
            declaration_re().is_match(line) || c_function_re().is_match(line)
        }
        Language::Shell => shell_function_re().is_match(line) || line.starts_with("function "),
        _ => declaration_re().is_match(line),
    }
}

/// Summarize source text already in memory.
pub fn summarize_source(path: &Path, source: &str, preview_lines: usize) -> FileSummary {
    let language = Language::from_filename(&path.to_string_lossy());
    let mut imports = Vec::new();
    let mut declarations = Vec::new();
    let mut todos = Vec::new();
    let mut preview = Vec::new();
    let mut line_count = 0;

    for (idx, line) in source.lines().enumerate() {
        line_count += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if preview.len() < preview_lines {
            preview.push(truncate(line.trim_end(), MAX_PREVIEW_WIDTH));
        }

        if let Some(caps) = todo_re().captures(line) {
            if todos.len() < MAX_TODOS {
                let text = caps.get(2).map_or("", |m| m.as_str()).trim();
                let text = text.trim_end_matches("*/").trim_end();
                todos.push(TodoMarker {
                    line: idx + 1,
                    text: format!("{}: {}", &caps[1], truncate(text, MAX_PREVIEW_WIDTH)),
                });
            }
            continue;
        }

        if import_re().is_match(line) {
            if imports.len() < MAX_IMPORTS {
                imports.push(truncate(trimmed.trim_end_matches(';'), MAX_PREVIEW_WIDTH));
            }
        } else if is_declaration(line, &language) && declarations.len() < MAX_DECLARATIONS {
            declarations.push(clean_declaration(line));
        }
    }

    FileSummary {
        path: path.to_path_buf(),
        language,
        line_count,
        imports,
        declarations,
        todos,
        preview,
    }
}

/// Read and summarize a file from disk.
pub fn summarize_file(path: &Path, config: &ScanConfig) -> Result<FileSummary, ScanError> {
    let metadata = std::fs::metadata(path).map_err(|e| ScanError::io(path, e))?;
    if metadata.len() > config.max_file_bytes {
        return Err(ScanError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: config.max_file_bytes,
        });
    }
    let source = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    Ok(summarize_source(path, &source, config.preview_lines))
}

impl FileSummary {
    /// Render the summary as prompt text.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} ({}, {} lines)\n",
            self.path.display(),
            self.language,
            self.line_count
        );
        if !self.imports.is_empty() {
            out.push_str(&format!("  imports: {}\n", self.imports.join("; ")));
        }
        if !self.declarations.is_empty() {
            out.push_str("  declares:\n");
            for decl in &self.declarations {
                out.push_str(&format!("    - {}\n", decl));
            }
        }
        for todo in &self.todos {
            out.push_str(&format!("  line {}: {}\n", todo.line, todo.text));
        }
        if !self.preview.is_empty() {
            out.push_str("  preview:\n");
            for line in &self.preview {
                out.push_str(&format!("    | {}\n", line));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_summary() {
        let source = "\
import os
from typing import List

# TODO: handle draws
class Board:
    def place(self, x):
        pass

def main():
    pass
";
        let summary = summarize_source(Path::new("game.py"), source, 3);
        assert_eq!(summary.language, Language::Python);
        assert_eq!(summary.line_count, 10);
        assert_eq!(summary.imports, vec!["import os", "from typing import List"]);
        assert_eq!(summary.declarations, vec!["class Board", "def main()"]);
        assert_eq!(summary.todos.len(), 1);
        assert_eq!(summary.todos[0].line, 4);
        assert_eq!(summary.todos[0].text, "TODO: handle draws");
        assert_eq!(summary.preview.len(), 3);
    }

    #[test]
    fn test_rust_summary() {
        let source = "\
use std::io;

pub struct Game {
    turn: u8,
}

impl Game {
    fn step(&mut self) {}
}

pub(crate) fn run() -> io::Result<()> {
    // FIXME propagate errors
    Ok(())
}
";
        let summary = summarize_source(Path::new("src/game.rs"), source, 8);
        assert_eq!(summary.language, Language::Rust);
        assert_eq!(summary.imports, vec!["use std::io"]);
        assert_eq!(
            summary.declarations,
            vec![
                "pub struct Game",
                "impl Game",
                "pub(crate) fn run() -> io::Result<()>"
            ]
        );
        assert_eq!(summary.todos[0].text, "FIXME: propagate errors");
    }

    #[test]
    fn test_cpp_summary() {
        let source = "\
#include <iostream>

int main() {
    std::cout << \"Hello\" << std::endl;
    return 0;
}
";
        let summary = summarize_source(Path::new("main.cpp"), source, 8);
        assert_eq!(summary.imports, vec!["#include <iostream>"]);
        assert_eq!(summary.declarations, vec!["int main()"]);
    }

    #[test]
    fn test_javascript_summary() {
        let source = "\
const fs = require('fs');
import { readFile } from 'fs/promises';
export default function greet(name) {
  console.log(name);
}
export class Greeter {}
";
        let summary = summarize_source(Path::new("app.js"), source, 8);
        assert_eq!(summary.imports.len(), 2);
        assert_eq!(
            summary.declarations,
            vec!["export default function greet(name)", "export class Greeter {}"]
        );
    }

    #[test]
    fn test_shell_functions() {
        let source = "#!/bin/bash\nsource ./env.sh\ngreet() {\n  echo hi\n}\n";
        let summary = summarize_source(Path::new("run.sh"), source, 8);
        assert_eq!(summary.imports, vec!["source ./env.sh"]);
        assert_eq!(summary.declarations, vec!["greet()"]);
    }

    #[test]
    fn test_render_contains_sections() {
        let summary = summarize_source(Path::new("a.py"), "import os\ndef f():\n    pass\n", 2);
        let text = summary.render();
        assert!(text.starts_with("a.py (python, 3 lines)"));
        assert!(text.contains("imports: import os"));
        assert!(text.contains("    - def f()"));
        assert!(text.contains("    | import os"));
    }

    #[test]
    fn test_summarize_file_too_large() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("big.py");
        std::fs::write(&path, "x = 1\n".repeat(100)).unwrap();
        let config = ScanConfig {
            max_file_bytes: 10,
            ..ScanConfig::default()
        };
        let err = summarize_file(&path, &config).unwrap_err();
        assert!(matches!(err, ScanError::TooLarge { .. }));
    }

    #[test]
    fn test_summarize_file_missing() {
        let err = summarize_file(Path::new("/nonexistent/file.py"), &ScanConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/file.py"));
    }
}
