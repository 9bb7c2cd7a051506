//! Extraction tuned for collaborative-encyclopedia articles.
//!
//! These pages wrap the article body in one or more `mw-parser-output`
//! containers, some of which are decoys or stubs, and surround prose with
//! infoboxes, navboxes, edit links and reference markers.

use tracing::debug;

use super::{enforce_min_words, UNTITLED};
use crate::error::{ExtractionError, ExtractionResult};
use crate::html::{Element, ParsedDocument};
use crate::text::clean;
use crate::types::document::{ExtractedDocument, Section, SourceKind};

const CONTENT_SELECTOR: &str = "div.mw-parser-output";
const LEGACY_CONTAINER: &str = "div#mw-content-text";

/// A candidate container needs this many paragraphs to be preferred.
const MIN_CANDIDATE_PARAGRAPHS: usize = 3;

/// Paragraphs of this many characters or fewer are boilerplate.
const MIN_PARAGRAPH_CHARS: usize = 10;

const INTRO_PARAGRAPHS: usize = 3;
const MAX_HEADINGS: usize = 10;
const PARAGRAPHS_PER_SECTION: usize = 3;

const PRUNED: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "aside",
    "span.mw-editsection",
    "span.reference",
    "sup.reference",
    "table.infobox",
    "table.navbox",
    "table.vertical-navbox",
    "table.sidebar",
];

const SKIPPED_SECTIONS: &[&str] = &[
    "references",
    "external links",
    "see also",
    "notes",
    "further reading",
    "bibliography",
];

/// Whether `host` belongs to the encyclopedia this strategy targets.
pub fn handles_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host == "wikipedia.org" || host.ends_with(".wikipedia.org")
}

pub(crate) fn extract(doc: &ParsedDocument, min_words: usize) -> ExtractionResult<ExtractedDocument> {
    let title = title(doc);
    let area = content_area(doc)?;

    let mut content = ParsedDocument::subtree(area);
    for css in PRUNED {
        content.remove_all(css);
    }

    let paragraphs: Vec<String> = content
        .find_all("p")
        .iter()
        .map(|p| clean(&p.text()))
        .filter(|text| qualifies(text))
        .collect();
    debug!(paragraphs = paragraphs.len(), "Qualifying paragraphs");

    let mut sections = Vec::new();
    if !paragraphs.is_empty() {
        let intro = paragraphs
            .iter()
            .take(INTRO_PARAGRAPHS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        sections.push(Section::new("Introduction", intro));
    }

    for heading in content.find_all("h2, h3").into_iter().take(MAX_HEADINGS) {
        let heading_text = clean(&heading.text());
        if SKIPPED_SECTIONS.contains(&heading_text.to_lowercase().as_str()) {
            continue;
        }
        let body = section_paragraphs(heading);
        if !body.is_empty() {
            sections.push(Section::new(heading_text, body.join(" ")));
        }
    }

    let full_text = paragraphs.join(" ");
    enforce_min_words(&full_text, min_words)?;

    Ok(ExtractedDocument::new(
        title,
        full_text,
        sections,
        SourceKind::Specialized,
    ))
}

fn qualifies(text: &str) -> bool {
    text.chars().count() > MIN_PARAGRAPH_CHARS
}

fn title(doc: &ParsedDocument) -> String {
    ["h1.firstHeading", "h1"]
        .iter()
        .filter_map(|css| doc.find_first(css))
        .map(|h1| clean(&h1.text()))
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Pick the article container.
///
/// First candidate with enough paragraphs, else the first candidate, else the
/// legacy content wrapper.
fn content_area(doc: &ParsedDocument) -> ExtractionResult<Element<'_>> {
    let candidates = doc.find_all(CONTENT_SELECTOR);
    debug!(candidates = candidates.len(), "Content candidates");

    if let Some(found) = candidates
        .iter()
        .find(|c| c.find_all("p").len() >= MIN_CANDIDATE_PARAGRAPHS)
    {
        return Ok(*found);
    }
    if let Some(first) = candidates.first() {
        return Ok(*first);
    }
    if let Some(legacy) = doc.find_first(LEGACY_CONTAINER) {
        return Ok(legacy.find_first(CONTENT_SELECTOR).unwrap_or(legacy));
    }

    Err(ExtractionError::MissingContent {
        reason: "no article container in encyclopedia page".to_string(),
    })
}

fn is_section_heading(el: &Element<'_>) -> bool {
    matches!(el.name(), "h2" | "h3")
}

/// Heading wrapper used by current encyclopedia markup.
fn is_heading_wrapper(el: &Element<'_>) -> bool {
    el.has_class("mw-heading") && el.find_first("h2, h3").is_some()
}

/// Up to three qualifying paragraphs following `heading`, stopping at the
/// next section heading.
fn section_paragraphs(heading: Element<'_>) -> Vec<String> {
    let anchor = match heading.parent() {
        Some(parent) if parent.has_class("mw-heading") => parent,
        _ => heading,
    };

    let mut found = Vec::new();
    for sibling in anchor.siblings_after() {
        if is_section_heading(&sibling) || is_heading_wrapper(&sibling) {
            break;
        }
        if sibling.name() == "p" {
            let text = clean(&sibling.text());
            if qualifies(&text) {
                found.push(text);
            }
        }
        if found.len() >= PARAGRAPHS_PER_SECTION {
            break;
        }
    }
    found
}
