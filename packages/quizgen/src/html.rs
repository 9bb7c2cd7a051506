//! Parsed HTML document interface.
//!
//! A thin wrapper over the `scraper` crate exposing the few operations the
//! extraction strategies need: CSS selection, text of a node, following
//! siblings, and pruning unwanted subtrees. The strategies never touch
//! `scraper` types directly.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(selector = css, error = ?e, "Invalid CSS selector");
            None
        }
    }
}

/// An HTML document tree.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parse a full HTML page.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Copy an element's subtree into its own document.
    ///
    /// Lets callers prune the copy without touching the source document.
    pub fn subtree(element: Element<'_>) -> Self {
        Self {
            html: Html::parse_fragment(&element.outer_html()),
        }
    }

    /// All elements matching `css`, in document order.
    pub fn find_all(&self, css: &str) -> Vec<Element<'_>> {
        let Some(sel) = selector(css) else {
            return Vec::new();
        };
        self.html
            .root_element()
            .select(&sel)
            .map(Element::from)
            .collect()
    }

    /// First element matching `css`.
    pub fn find_first(&self, css: &str) -> Option<Element<'_>> {
        let sel = selector(css)?;
        self.html.root_element().select(&sel).next().map(Element::from)
    }

    /// Detach every element matching `css`, with its subtree. Returns how
    /// many were removed.
    ///
    /// Lookups walk from the root element, so detached subtrees stay
    /// invisible to later `find_*` calls.
    pub fn remove_all(&mut self, css: &str) -> usize {
        let Some(sel) = selector(css) else {
            return 0;
        };
        let ids: Vec<_> = self
            .html
            .root_element()
            .select(&sel)
            .map(|el| el.id())
            .collect();
        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }
}

/// A borrowed element of a [`ParsedDocument`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Element<'a> {
    /// Lowercase tag name.
    pub fn name(&self) -> &'a str {
        self.inner.value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.value().classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes, unnormalized.
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }

    /// Descendant elements matching `css`, in document order.
    pub fn find_all(&self, css: &str) -> Vec<Element<'a>> {
        let Some(sel) = selector(css) else {
            return Vec::new();
        };
        self.inner.select(&sel).map(Element::from).collect()
    }

    /// First descendant matching `css`.
    pub fn find_first(&self, css: &str) -> Option<Element<'a>> {
        let sel = selector(css)?;
        self.inner.select(&sel).next().map(Element::from)
    }

    /// Element siblings following this one, nearest first.
    pub fn siblings_after(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        self.inner
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(Element::from)
    }

    /// Parent element, if the parent is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.inner
            .parent()
            .and_then(ElementRef::wrap)
            .map(Element::from)
    }

    /// Serialized HTML of this element and its subtree.
    pub fn outer_html(&self) -> String {
        self.inner.html()
    }
}
