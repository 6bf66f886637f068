//! Integration tests for learnsor-cli functionality.
//! Tests the underlying library functions that the CLI commands invoke.

use learnsor_core::config::LearnsorConfig;
use learnsor_core::markers::wrap_markers;
use learnsor_core::{HintDepth, Language, merge_texts};
use std::fs;

#[test]
fn test_config_load_without_file_uses_defaults() {
    let tmpdir = tempfile::tempdir().unwrap();
    let config = LearnsorConfig::load(tmpdir.path()).unwrap();
    assert_eq!(config.scan.max_files, 40);
    assert_eq!(config.generation.level2.max_tokens, 1500);
}

#[test]
fn test_config_load_rejects_bad_temperature() {
    let tmpdir = tempfile::tempdir().unwrap();
    fs::create_dir(tmpdir.path().join(".learnsor")).unwrap();
    fs::write(
        tmpdir.path().join(".learnsor/config.toml"),
        "[generation.level2]\nmax_tokens = 10\ntemperature = 3.0\n",
    )
    .unwrap();
    let err = LearnsorConfig::load(tmpdir.path()).unwrap_err();
    assert!(err.to_string().contains("temperature"));
}

#[test]
fn test_depth_flag_aliases() {
    assert_eq!("full".parse::<HintDepth>().unwrap(), HintDepth::Level3);
    assert_eq!("2".parse::<HintDepth>().unwrap(), HintDepth::Level2);
    assert!("level9".parse::<HintDepth>().is_err());
}

#[test]
fn test_offline_merge_of_saved_levels() {
    let tmpdir = tempfile::tempdir().unwrap();
    let level1 = tmpdir.path().join("hints.py");
    fs::write(
        &level1,
        "\"\"\"\n1. CONCEPT: board\n   WHY: state\n2. CONCEPT: turns\n   WHY: fairness\n\"\"\"\n",
    )
    .unwrap();
    let level2 = "```python\n\"\"\"\n2. HOW: alternate players\n\"\"\"\n```\n";

    let name = level1.to_string_lossy();
    let language = Language::resolve(None, Some(&name), None);
    let syntax = language.comment_syntax();
    let text = fs::read_to_string(&level1).unwrap();
    let merged = merge_texts(&text, Some(level2), None, &syntax);

    assert_eq!(
        wrap_markers(&merged, &syntax),
        "\"\"\"\n1. CONCEPT: board\n   WHY: state\n2. CONCEPT: turns\n   WHY: fairness\n   HOW: alternate players\n\"\"\"\n"
    );
}

#[test]
fn test_offline_merge_with_explicit_language() {
    let syntax = Language::resolve(Some("javascript"), Some("notes.txt"), None).comment_syntax();
    let merged = merge_texts(
        "/*\n1. CONCEPT: fetch\n  WHY: data\n*/",
        Some("/*\n1. HOW: call the API\n*/"),
        Some("/*\n1. CODE: const res = await ____(url);\n*/"),
        &syntax,
    );
    assert_eq!(
        wrap_markers(&merged, &syntax),
        "/*\n1. CONCEPT: fetch\n  WHY: data\n  HOW: call the API\n  CODE: const res = await ____(url);\n*/\n"
    );
}

#[test]
fn test_scan_renders_project_overview() {
    let tmpdir = tempfile::tempdir().unwrap();
    fs::write(tmpdir.path().join("game.py"), "import random\n\ndef play():\n    pass\n").unwrap();
    fs::write(tmpdir.path().join("README.md"), "# notes\n").unwrap();

    let config = LearnsorConfig::load(tmpdir.path()).unwrap();
    let summary = learnsor_scan::scan_project(tmpdir.path(), &config.scan).unwrap();
    let rendered = summary.render();

    assert_eq!(summary.files.len(), 1);
    assert!(rendered.contains("game.py"));
    assert!(rendered.contains("def play()"));
}

#[test]
fn test_languages_table_has_markers() {
    for language in Language::all() {
        let syntax = language.comment_syntax();
        assert!(!language.extensions().is_empty(), "{language}");
        assert!(!syntax.start.is_empty());
        assert!(!syntax.end.is_empty());
    }
}
