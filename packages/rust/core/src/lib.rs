//! Core build pipeline for the documentation search index.
//!
//! This crate ties together Markdown compilation, lexeme extraction,
//! metadata generation, validation and output assembly into the end-to-end
//! `build_docs` workflow.

pub mod assembler;
pub mod lexemes;
pub mod meta;
pub mod ndjson;
pub mod pipeline;
pub mod validate;
