use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use ropey::{Rope, RopeSlice};

/// ATX heading marker: up to three spaces of indent, one to six `#`,
/// then whitespace or end of line.
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}#{1,6}(?:\s|$)").expect("valid heading regex"));

/// Returns true if `line` opens an ATX heading.
pub fn is_heading_line(line: &str) -> bool {
    HEADING_MARKER.is_match(line)
}

/// The source pane's text, backed by a rope.
///
/// Line indices are zero-based; line content excludes the trailing
/// newline.
#[derive(Debug, Clone, Default)]
pub struct SourceText {
    rope: Rope,
}

impl SourceText {
    /// Create a source text from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total number of lines.
    ///
    /// A trailing newline opens one more (empty) line, as a text area
    /// would show it.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// The full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole text.
    ///
    /// Only the span between the common prefix and suffix is spliced,
    /// so a keystroke touches one small region of the rope.
    pub fn set_text(&mut self, text: &str) {
        let old_len = self.rope.len_chars();
        let new_len = text.chars().count();
        let prefix = self
            .rope
            .chars()
            .zip(text.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = self
            .rope
            .chars_at(old_len)
            .reversed()
            .zip(text.chars().rev())
            .take(old_len.min(new_len) - prefix)
            .take_while(|(a, b)| a == b)
            .count();

        self.rope.remove(prefix..old_len - suffix);
        let inserted = &text[byte_of_char(text, prefix)..byte_of_char(text, new_len - suffix)];
        if !inserted.is_empty() {
            self.rope.insert(prefix, inserted);
        }
    }

    /// Indices of lines that open a heading.
    pub fn heading_lines(&self) -> Vec<usize> {
        self.rope
            .lines()
            .enumerate()
            .filter(|(_, line)| is_heading_line(&line_text(*line)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Line 0 plus every non-blank line that follows a blank line.
    pub fn block_start_lines(&self) -> Vec<usize> {
        let mut starts = vec![0];
        let mut prev_blank = false;
        for (idx, line) in self.rope.lines().enumerate() {
            let blank = line.chars().all(char::is_whitespace);
            if idx > 0 && prev_blank && !blank {
                starts.push(idx);
            }
            prev_blank = blank;
        }
        starts
    }
}

/// A line's text without its line ending; borrows when the slice is
/// contiguous in the rope.
fn line_text(line: RopeSlice<'_>) -> Cow<'_, str> {
    let text = line.as_str().map_or_else(|| Cow::Owned(line.to_string()), Cow::Borrowed);
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim_end_matches(['\n', '\r'])),
        Cow::Owned(s) => Cow::Owned(s.trim_end_matches(['\n', '\r']).to_string()),
    }
}

/// Byte offset of the `n`th char, or the end of `text`.
fn byte_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(idx, _)| idx)
}
