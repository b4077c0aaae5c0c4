//! Full-width and focused-column styling of the content region.

use super::constants::{
    self, ANCESTOR_RESET, FOCUSED_IMAGE, FOCUSED_PADDING, FULL_WIDTH_ANCESTOR,
    FULL_WIDTH_REGION, READING_TYPOGRAPHY,
};
use crate::dom::{Dom, NodeId};
use crate::model::{LayoutMode, PageState};
use std::collections::BTreeSet;
use tracing::debug;

/// Applies a [`LayoutMode`] to the region and reports the resulting page count.
///
/// Remembers every ancestor it widened so leaving full-width mode resets
/// exactly those nodes back to their stylesheet values. Images fitted to the
/// focused column are tracked the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEngine {
    column_width: u32,
    touched: BTreeSet<NodeId>,
    images: BTreeSet<NodeId>,
}

impl LayoutEngine {
    /// Engine with a focused column of `column_width` CSS pixels.
    pub fn new(column_width: u32) -> Self {
        Self {
            column_width,
            touched: BTreeSet::new(),
            images: BTreeSet::new(),
        }
    }

    /// Ancestors currently carrying full-width overrides.
    pub fn touched(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.touched.iter().copied()
    }

    /// Images currently fitted to the focused column.
    pub fn fitted_images(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.images.iter().copied()
    }

    /// Style `region` for `mode` and return the page count for its new height.
    pub fn apply_mode<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        region: NodeId,
        mode: LayoutMode,
        state: &PageState,
    ) -> usize {
        let body = dom.body();
        let chain: Vec<NodeId> = dom
            .ancestors(region)
            .into_iter()
            .take_while(|&n| n != body)
            .collect();

        match mode {
            LayoutMode::FullWidth => {
                constants::apply(dom, region, FULL_WIDTH_REGION, true);
                for &ancestor in &chain {
                    constants::apply(dom, ancestor, FULL_WIDTH_ANCESTOR, false);
                    self.touched.insert(ancestor);
                }
                if region != body {
                    constants::apply(dom, body, FULL_WIDTH_ANCESTOR, false);
                }
                self.release_images(dom);
            }
            LayoutMode::Focused => {
                let max_width = format!("{}px", self.column_width);
                dom.set_style(region, "width", "auto", true);
                dom.set_style(region, "max-width", &max_width, true);
                dom.set_style(region, "margin", "0 auto", true);
                dom.set_style(region, "padding", FOCUSED_PADDING, true);
                self.reset_ancestors(dom, chain);
                if region != body {
                    reset_box(dom, body);
                }
                self.fit_images(dom, region);
            }
        }
        constants::apply(dom, region, READING_TYPOGRAPHY, true);

        let content_height = dom.scroll_height(region);
        let pages = state.page_count_for(content_height);
        debug!(?mode, content_height, pages, "Applied layout mode");
        pages
    }

    /// Remove every override this engine applied, including on the region.
    pub fn restore<D: Dom + ?Sized>(&mut self, dom: &mut D, region: NodeId) {
        let body = dom.body();
        let touched: Vec<NodeId> = self.touched.iter().copied().collect();
        self.reset_ancestors(dom, touched);
        for (property, _) in FULL_WIDTH_REGION.iter().chain(READING_TYPOGRAPHY) {
            dom.clear_style(region, property);
        }
        if region != body {
            reset_box(dom, body);
        }
        self.release_images(dom);
    }

    fn fit_images<D: Dom + ?Sized>(&mut self, dom: &mut D, region: NodeId) {
        let mut stack = dom.children(region);
        while let Some(node) = stack.pop() {
            if dom.tag_name(node) == "img" {
                constants::apply(dom, node, FOCUSED_IMAGE, true);
                self.images.insert(node);
            }
            stack.extend(dom.children(node));
        }
    }

    fn release_images<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        for node in std::mem::take(&mut self.images) {
            for (property, _) in FOCUSED_IMAGE {
                dom.clear_style(node, property);
            }
        }
    }

    fn reset_ancestors<D: Dom + ?Sized>(&mut self, dom: &mut D, chain: Vec<NodeId>) {
        let nodes: BTreeSet<NodeId> = std::mem::take(&mut self.touched)
            .into_iter()
            .chain(chain)
            .collect();
        for node in nodes {
            reset_box(dom, node);
        }
    }
}

fn reset_box<D: Dom + ?Sized>(dom: &mut D, node: NodeId) {
    for property in ANCESTOR_RESET {
        dom.clear_style(node, property);
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
