//! Extracted article content.

use serde::{Deserialize, Serialize};

/// Which extraction heuristic produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    /// Heavily-templated collaborative encyclopedia page
    Specialized,
    /// Any other page layout
    Generic,
}

/// A headed block of article text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }
}

/// Clean, sectioned article text produced by one extraction call.
///
/// Immutable once built; `word_count` always matches `full_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    title: String,
    full_text: String,
    sections: Vec<Section>,
    word_count: usize,
    source_kind: SourceKind,
}

impl ExtractedDocument {
    pub(crate) fn new(
        title: String,
        full_text: String,
        sections: Vec<Section>,
        source_kind: SourceKind,
    ) -> Self {
        let word_count = crate::text::word_count(&full_text);
        Self {
            title,
            full_text,
            sections,
            word_count,
            source_kind,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Non-empty section headings, in document order.
    pub fn section_headings(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| !s.heading.is_empty())
            .map(|s| s.heading.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_follows_text() {
        let doc = ExtractedDocument::new(
            "T".into(),
            "one two  three".into(),
            vec![Section::new("Intro", "one"), Section::new("", "two")],
            SourceKind::Generic,
        );
        assert_eq!(doc.word_count(), 3);
        assert_eq!(doc.section_headings(), vec!["Intro".to_string()]);
    }
}
