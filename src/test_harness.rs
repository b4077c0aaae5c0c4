//! Fixture builders shared by unit tests.
//!
//! Pages are described with [`NodeSpec`] so each test states exactly the
//! geometry and text it relies on.

use crate::config::ResolvedConfig;
use crate::dom::{DocumentSpec, Dom, MemoryDom, NodeId, NodeSpec};
use crate::host::Host;
use crate::reader::Reader;
use crate::schedule::ManualScheduler;
use std::time::Duration;

/// `n` characters of filler text with no surrounding whitespace.
pub fn text_of_len(n: usize) -> String {
    "lorem".chars().cycle().take(n).collect()
}

/// Paragraph element carrying `n` characters of text.
pub fn paragraph(n: usize) -> NodeSpec {
    NodeSpec::element("p").with_text(text_of_len(n))
}

/// `<article id="article">` with `scroll_height` (focused) and
/// `wide_scroll_height` (full width), holding `text_len` characters.
pub fn article(text_len: usize, scroll_height: f64, wide_scroll_height: f64) -> NodeSpec {
    NodeSpec::element("article")
        .with_id("article")
        .with_scroll_height(scroll_height)
        .with_wide_scroll_height(wide_scroll_height)
        .with_child(paragraph(text_len))
}

/// Typical page: nav, the article directly under `<body>`, a short aside, footer.
///
/// The article is the only element holding its text, so the locator picks it.
pub fn article_page(viewport: f64, scroll_height: f64, wide_scroll_height: f64) -> MemoryDom {
    MemoryDom::new(DocumentSpec::new(
        viewport,
        [
            NodeSpec::element("nav").with_child(paragraph(400)),
            article(1500, scroll_height, wide_scroll_height),
            NodeSpec::element("aside").with_child(paragraph(60)),
            NodeSpec::element("footer").with_child(paragraph(300)),
        ],
    ))
}

/// The article alone inside `<div id="wrapper">`, for layout tests that need
/// an ancestor between the region and `<body>`.
///
/// The wrapper carries exactly the article's text, so on this page the
/// locator keeps the wrapper (found first on a tie).
pub fn wrapped_article_page(
    viewport: f64,
    scroll_height: f64,
    wide_scroll_height: f64,
) -> MemoryDom {
    MemoryDom::new(DocumentSpec::new(
        viewport,
        [NodeSpec::element("div")
            .with_id("wrapper")
            .with_child(article(1500, scroll_height, wide_scroll_height))],
    ))
}

/// Config with every flag at its default and a throwaway log path.
pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        log_file_path: std::env::temp_dir().join("ereader_view_test.log"),
        ..ResolvedConfig::default()
    }
}

/// Reader over `dom` with the default config, not yet initialized.
pub fn reader(dom: MemoryDom) -> Reader<MemoryDom, ManualScheduler> {
    Reader::new(dom, ManualScheduler::new(), test_config())
}

/// Reader over `dom` that has completed initialization.
pub fn active_reader(dom: MemoryDom) -> Reader<MemoryDom, ManualScheduler> {
    let mut r = reader(dom);
    r.initialize();
    assert!(r.is_active(), "fixture page should initialize");
    r
}

/// Same as [`active_reader`] but with a host attached.
pub fn active_reader_with_host(
    dom: MemoryDom,
    host: Box<dyn Host>,
) -> Reader<MemoryDom, ManualScheduler> {
    let mut r = reader(dom).with_host(host);
    r.initialize();
    assert!(r.is_active(), "fixture page should initialize");
    r
}

/// Fire every timer due within `ms` milliseconds from now.
pub fn advance(r: &mut Reader<MemoryDom, ManualScheduler>, ms: u64) {
    let until = r.scheduler().now() + Duration::from_millis(ms);
    while let Some(token) = r.scheduler_mut().pop_due(until) {
        r.handle_timer(token);
    }
    r.scheduler_mut().advance_to(until);
}

/// Node with the given `id`.
pub fn by_id(dom: &MemoryDom, id: &str) -> NodeId {
    dom.element_by_id(id)
        .unwrap_or_else(|| panic!("fixture has no #{}", id))
}
