//! Language detection from filenames and per-language comment-block syntax.
//!
//! Both lookups are total: an unknown extension resolves to Python, and an unknown
//! language identifier keeps its name but borrows Python's triple-quote markers.

use serde::{Serialize, Serializer};
use std::fmt;

/// A programming language the hints are written for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    TypeScript,
    Cpp,
    C,
    CSharp,
    Java,
    Kotlin,
    Swift,
    Go,
    Rust,
    Php,
    Ruby,
    Scala,
    Shell,
    /// A language without a table entry, kept by (lowercased) name.
    Other(String),
}

/// The start/end marker pair of a language's block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub start: &'static str,
    pub end: &'static str,
}

impl CommentSyntax {
    /// Python docstring quotes, used for unknown languages.
    pub const DEFAULT: CommentSyntax = CommentSyntax {
        start: "\"\"\"",
        end: "\"\"\"",
    };

    const C_STYLE: CommentSyntax = CommentSyntax {
        start: "/*",
        end: "*/",
    };

    /// Whether a (trimmed) line consists of nothing but one of the markers.
    pub fn is_marker_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        !trimmed.is_empty() && (trimmed == self.start || trimmed == self.end)
    }
}

impl Language {
    /// Every language with a table entry, in display order.
    pub fn all() -> [Language; 15] {
        [
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Cpp,
            Language::C,
            Language::CSharp,
            Language::Java,
            Language::Kotlin,
            Language::Swift,
            Language::Go,
            Language::Rust,
            Language::Php,
            Language::Ruby,
            Language::Scala,
            Language::Shell,
        ]
    }

    /// Map a bare file extension (no dot, any case) to a language.
    pub fn from_extension(ext: &str) -> Option<Language> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "py" => Language::Python,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
            "c" | "h" => Language::C,
            "cs" => Language::CSharp,
            "java" => Language::Java,
            "kt" => Language::Kotlin,
            "swift" => Language::Swift,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "php" => Language::Php,
            "rb" => Language::Ruby,
            "scala" => Language::Scala,
            "sh" | "bash" | "zsh" => Language::Shell,
            _ => return None,
        };
        Some(lang)
    }

    /// Detect the language from a filename or path.
    ///
    /// The extension is whatever follows the last `.`. Empty names and unknown
    /// extensions fall back to Python.
    pub fn from_filename(filename: &str) -> Language {
        let filename = filename.trim();
        if filename.is_empty() {
            return Language::default();
        }
        let ext = filename.rsplit('.').next().unwrap_or_default();
        Language::from_extension(ext).unwrap_or_default()
    }

    /// Resolve a canonical language identifier, case-insensitively.
    ///
    /// Anything else (including shorthands like `js`) is kept as [`Language::Other`]
    /// and gets the default `"""` markers.
    pub fn from_name(name: &str) -> Language {
        let name = name.trim().to_ascii_lowercase();
        Language::all()
            .into_iter()
            .find(|lang| lang.name() == name)
            .unwrap_or(Language::Other(name))
    }

    /// Canonical identifier used in prompts and output.
    pub fn name(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Scala => "scala",
            Language::Shell => "shell",
            Language::Other(name) => name,
        }
    }

    /// File extensions that map to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "jsx"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp"],
            Language::C => &["c", "h"],
            Language::CSharp => &["cs"],
            Language::Java => &["java"],
            Language::Kotlin => &["kt"],
            Language::Swift => &["swift"],
            Language::Go => &["go"],
            Language::Rust => &["rs"],
            Language::Php => &["php"],
            Language::Ruby => &["rb"],
            Language::Scala => &["scala"],
            Language::Shell => &["sh", "bash", "zsh"],
            Language::Other(_) => &[],
        }
    }

    /// Block-comment markers the hints are wrapped in.
    pub fn comment_syntax(&self) -> CommentSyntax {
        match self {
            Language::Python | Language::Other(_) => CommentSyntax::DEFAULT,
            Language::Ruby => CommentSyntax {
                start: "=begin",
                end: "=end",
            },
            Language::Shell => CommentSyntax {
                start: "<< 'COMMENT'",
                end: "COMMENT",
            },
            Language::JavaScript
            | Language::TypeScript
            | Language::Cpp
            | Language::C
            | Language::CSharp
            | Language::Java
            | Language::Kotlin
            | Language::Swift
            | Language::Go
            | Language::Rust
            | Language::Php
            | Language::Scala => CommentSyntax::C_STYLE,
        }
    }

    /// Pick the hint language: explicit identifier, then filename, then the
    /// active file's path, then Python.
    pub fn resolve(
        explicit: Option<&str>,
        filename: Option<&str>,
        active_file: Option<&str>,
    ) -> Language {
        if let Some(name) = explicit.filter(|n| !n.trim().is_empty()) {
            return Language::from_name(name);
        }
        if let Some(name) = filename.filter(|n| !n.trim().is_empty()) {
            return Language::from_filename(name);
        }
        if let Some(path) = active_file.filter(|n| !n.trim().is_empty()) {
            return Language::from_filename(path);
        }
        Language::default()
    }
}

/// Look up the comment-block markers for a language identifier.
pub fn comment_syntax(language: &str) -> CommentSyntax {
    Language::from_name(language).comment_syntax()
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename_known_extensions() {
        assert_eq!(Language::from_filename("script.py"), Language::Python);
        assert_eq!(Language::from_filename("main.cpp"), Language::Cpp);
        assert_eq!(Language::from_filename("App.TSX"), Language::TypeScript);
        assert_eq!(Language::from_filename("src/lib.rs"), Language::Rust);
        assert_eq!(Language::from_filename("deploy.zsh"), Language::Shell);
        assert_eq!(Language::from_filename("util.h"), Language::C);
    }

    #[test]
    fn test_from_filename_fallbacks() {
        assert_eq!(Language::from_filename(""), Language::Python);
        assert_eq!(Language::from_filename("notes.txt"), Language::Python);
        assert_eq!(Language::from_filename("Makefile"), Language::Python);
    }

    #[test]
    fn test_comment_syntax_table() {
        assert_eq!(comment_syntax("python"), CommentSyntax::DEFAULT);
        assert_eq!(comment_syntax("JavaScript").start, "/*");
        assert_eq!(comment_syntax("rust").end, "*/");
        assert_eq!(comment_syntax("ruby").start, "=begin");
        assert_eq!(comment_syntax("ruby").end, "=end");
        assert_eq!(comment_syntax("shell").start, "<< 'COMMENT'");
        assert_eq!(comment_syntax("shell").end, "COMMENT");
    }

    #[test]
    fn test_comment_syntax_unknown_falls_back() {
        assert_eq!(comment_syntax("haskell"), CommentSyntax::DEFAULT);
        assert_eq!(comment_syntax(""), CommentSyntax::DEFAULT);
    }

    #[test]
    fn test_from_name_keeps_unknown_identifier() {
        let lang = Language::from_name("Haskell");
        assert_eq!(lang, Language::Other("haskell".to_string()));
        assert_eq!(lang.name(), "haskell");
    }

    #[test]
    fn test_every_extension_round_trips_to_its_language() {
        for lang in Language::all() {
            for ext in lang.extensions() {
                assert_eq!(Language::from_extension(ext).as_ref(), Some(&lang));
            }
        }
    }

    #[test]
    fn test_resolve_precedence() {
        assert_eq!(
            Language::resolve(Some("go"), Some("main.rs"), None),
            Language::Go
        );
        assert_eq!(
            Language::resolve(None, Some("main.rs"), Some("app.js")),
            Language::Rust
        );
        assert_eq!(
            Language::resolve(None, None, Some("src/app.js")),
            Language::JavaScript
        );
        assert_eq!(Language::resolve(Some("  "), None, None), Language::Python);
    }

    #[test]
    fn test_is_marker_line() {
        let syntax = Language::Cpp.comment_syntax();
        assert!(syntax.is_marker_line("  /*  "));
        assert!(syntax.is_marker_line("*/"));
        assert!(!syntax.is_marker_line("/* inline"));
        assert!(!syntax.is_marker_line(""));
    }

    #[test]
    fn test_from_name_accepts_canonical_identifiers_only() {
        assert_eq!(Language::from_name(" TypeScript "), Language::TypeScript);
        assert_eq!(Language::from_name("csharp"), Language::CSharp);
        for alias in ["js", "c++", "golang", "node", "py"] {
            assert_eq!(comment_syntax(alias), CommentSyntax::DEFAULT, "{alias}");
        }
    }
}
