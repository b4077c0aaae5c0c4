//! Heuristic search for the page's main readable region.
//!
//! The page is unknown markup, so the locator makes no semantic assumptions: it
//! walks every element under `<body>` in document order and keeps the visible
//! one holding the most text. Page chrome (`header`, `footer`, `nav`) is pruned
//! with its whole subtree; non-content tags are skipped individually.

use crate::dom::{BoundingBox, Dom, NodeId};
use serde::Serialize;
use tracing::{debug, warn};

/// Minimum trimmed text length (exclusive) for a node to qualify.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 100;

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript"];
const CHROME_TAGS: &[&str] = &["header", "footer", "nav"];

/// The node every other component paginates.
///
/// The page owns the node; the engine only restyles it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentRegion {
    /// Chosen node (the body when nothing qualified).
    pub node: NodeId,
    /// Trimmed text length in characters.
    pub text_length: usize,
    /// Rendered size at selection time.
    pub bounds: BoundingBox,
}

/// Why a candidate was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `script`, `style` or `noscript`.
    NonContentTag,
    /// `header`, `footer` or `nav` (subtree skipped).
    PageChrome,
    /// A style, geometry or text query failed.
    QueryFailed,
    /// `display: none` or `visibility: hidden`.
    Hidden,
    /// Zero rendered width or height.
    Empty,
    /// Not more than the minimum text length.
    TooShort,
}

/// Finds the primary readable region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLocator {
    min_text_length: usize,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_LENGTH)
    }
}

impl ContentLocator {
    /// Locator requiring strictly more than `min_text_length` characters.
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    /// Minimum text length this locator requires (exclusive).
    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }

    /// Pick the qualifying node with the most text, or the body.
    ///
    /// Never fails: query errors on a candidate reject that candidate only.
    /// On equal lengths the node found first wins.
    pub fn locate<D: Dom + ?Sized>(&self, dom: &D) -> ContentRegion {
        let body = dom.body();
        let mut best: Option<ContentRegion> = None;

        // Depth-first, document order. Children are pushed in reverse so the
        // first child is popped next.
        let mut stack: Vec<NodeId> = dom.children(body).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            let tag = dom.tag_name(node);
            if CHROME_TAGS.contains(&tag.as_str()) {
                debug!(%node, %tag, "Pruning page chrome subtree");
                continue;
            }
            stack.extend(dom.children(node).into_iter().rev());

            match self.evaluate(dom, node, &tag) {
                Ok(candidate) => {
                    if best.map_or(true, |b| candidate.text_length > b.text_length) {
                        best = Some(candidate);
                    }
                }
                Err(Rejection::QueryFailed) => {
                    warn!(%node, %tag, "Rejecting content candidate after failed query");
                }
                Err(_) => {}
            }
        }

        match best {
            Some(region) => {
                debug!(node = %region.node, text_length = region.text_length, "Located content region");
                region
            }
            None => {
                debug!("No qualifying content region; falling back to body");
                ContentRegion {
                    node: body,
                    text_length: dom
                        .text_content(body)
                        .map(|t| t.trim().chars().count())
                        .unwrap_or(0),
                    bounds: dom.bounding_box(body).unwrap_or_default(),
                }
            }
        }
    }

    /// Check one node, returning its region when it qualifies.
    pub fn evaluate<D: Dom + ?Sized>(
        &self,
        dom: &D,
        node: NodeId,
        tag: &str,
    ) -> Result<ContentRegion, Rejection> {
        if SKIPPED_TAGS.contains(&tag) {
            return Err(Rejection::NonContentTag);
        }
        if dom.closest_tag(node, CHROME_TAGS).is_some() {
            return Err(Rejection::PageChrome);
        }

        let style = dom
            .computed_style(node)
            .map_err(|_| Rejection::QueryFailed)?;
        if style.is_hidden() {
            return Err(Rejection::Hidden);
        }

        let bounds = dom.bounding_box(node).map_err(|_| Rejection::QueryFailed)?;
        if bounds.is_empty() {
            return Err(Rejection::Empty);
        }

        let text = dom.text_content(node).map_err(|_| Rejection::QueryFailed)?;
        let text_length = text.trim().chars().count();
        if text_length <= self.min_text_length {
            return Err(Rejection::TooShort);
        }

        Ok(ContentRegion {
            node,
            text_length,
            bounds,
        })
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
