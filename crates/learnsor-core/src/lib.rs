//! Core types for LearnSor tiered hints.
//!
//! Provides the language and comment-syntax tables ([`language`]), hint depths
//! ([`depth`]), comment-marker handling ([`markers`]), the per-level field parser
//! ([`parser`]), the three-level merge engine ([`merge`]), a structured view of
//! merged hints ([`document`]), and configuration loading ([`config`]).

pub mod config;
pub mod depth;
pub mod document;
pub mod language;
pub mod markers;
pub mod merge;
pub mod parser;

pub use depth::HintDepth;
pub use language::{CommentSyntax, Language};
pub use merge::{merge_levels, merge_texts};
pub use parser::{FieldKind, FieldMap, parse_level};
