//! Source-side document text.
//!
//! This module handles:
//! - Holding the source pane's text in a rope
//! - Classifying lines as headings or block starts

mod source;

pub use source::{SourceText, is_heading_line};
