//! Phase 1: Line Classifier
//!
//! Splits the document into lines and tags each one through the keyword
//! matcher. Classification of a line never looks at its neighbours.

use crate::keyword::{is_header, is_story, match_keyword, Level};

/// A single line after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Structural level, or `None` for plain content.
    pub level: Option<Level>,
    /// Text after the first colon, trimmed. Empty for plain content.
    pub title: String,
    /// The line as it appeared in the source, without the line ending.
    pub raw: String,
    /// One-based line number.
    pub line_num: usize,
    /// Whether the line is a feature header (`Feature: ...`).
    pub header: bool,
    /// Whether the line opens a user story block (`User story:`).
    pub story: bool,
}

impl ClassifiedLine {
    /// Returns `true` when the line opens a scenario or a step.
    pub fn is_structural(&self) -> bool {
        self.level.is_some()
    }
}

/// Classify every line of a document.
pub fn classify(source: &str) -> Vec<ClassifiedLine> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let line = if idx == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line
            };
            classify_line(line, idx + 1)
        })
        .collect()
}

/// Classify a single line.
pub fn classify_line(line: &str, line_num: usize) -> ClassifiedLine {
    match match_keyword(line) {
        Some(m) => {
            tracing::trace!(line_num, level = ?m.level, title = %m.title, "structural line");
            ClassifiedLine {
                level: Some(m.level),
                title: m.title,
                raw: line.to_string(),
                line_num,
                header: false,
                story: false,
            }
        }
        None => ClassifiedLine {
            level: None,
            title: String::new(),
            raw: line.to_string(),
            line_num,
            header: is_header(line),
            story: is_story(line),
        },
    }
}
