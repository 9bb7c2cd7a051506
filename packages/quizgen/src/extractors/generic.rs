//! Fallback extraction for arbitrary page layouts.

use std::sync::LazyLock;

use regex::Regex;

use super::{enforce_min_words, UNTITLED};
use crate::error::{ExtractionError, ExtractionResult};
use crate::html::{Element, ParsedDocument};
use crate::text::clean;
use crate::types::document::{ExtractedDocument, Section, SourceKind};

static RE_CONTENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|article|post").expect("valid class regex"));

const PRUNED: &[&str] = &["script", "style", "nav", "footer", "aside", "header", "form"];

const FIRST_SECTION: &str = "Main Content";

pub(crate) fn extract(doc: &ParsedDocument, min_words: usize) -> ExtractionResult<ExtractedDocument> {
    let title = title(doc);
    let area = content_area(doc)?;

    let mut content = ParsedDocument::subtree(area);
    for css in PRUNED {
        content.remove_all(css);
    }

    let mut sections = Vec::new();
    let mut current = Section::new(FIRST_SECTION, "");
    let mut text_parts: Vec<String> = Vec::new();

    for el in content.find_all("p, h1, h2, h3, h4") {
        if el.name() == "p" {
            let text = clean(&el.text());
            if text.is_empty() {
                continue;
            }
            if !current.content.is_empty() {
                current.content.push(' ');
            }
            current.content.push_str(&text);
            text_parts.push(text);
        } else {
            let next = Section::new(clean(&el.text()), "");
            let finished = std::mem::replace(&mut current, next);
            if !finished.content.is_empty() {
                sections.push(finished);
            }
        }
    }
    if !current.content.is_empty() {
        sections.push(current);
    }

    let full_text = text_parts.join(" ");
    enforce_min_words(&full_text, min_words)?;

    Ok(ExtractedDocument::new(
        title,
        full_text,
        sections,
        SourceKind::Generic,
    ))
}

/// First non-empty of: `<h1>`, `<title>`, Open Graph title.
fn title(doc: &ParsedDocument) -> String {
    ["h1", "title"]
        .iter()
        .filter_map(|css| doc.find_first(css))
        .map(|el| clean(&el.text()))
        .chain(
            doc.find_first(r#"meta[property="og:title"]"#)
                .and_then(|meta| meta.attr("content"))
                .map(clean),
        )
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// First of `<article>`, `<main>`, a content-like `<div>`, `<body>`.
fn content_area(doc: &ParsedDocument) -> ExtractionResult<Element<'_>> {
    doc.find_first("article")
        .or_else(|| doc.find_first("main"))
        .or_else(|| {
            doc.find_all("div[class]")
                .into_iter()
                .find(|div| RE_CONTENT_CLASS.is_match(div.attr("class").unwrap_or_default()))
        })
        .or_else(|| doc.find_first("body"))
        .ok_or_else(|| ExtractionError::MissingContent {
            reason: "page has no article, main, content or body element".to_string(),
        })
}
