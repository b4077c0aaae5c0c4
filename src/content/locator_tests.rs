//! Tests for content location.

use super::*;
use crate::dom::{DocumentSpec, MemoryDom, NodeSpec};
use crate::test_harness::{by_id, paragraph, text_of_len};

fn page(children: impl IntoIterator<Item = NodeSpec>) -> MemoryDom {
    MemoryDom::new(DocumentSpec::new(800.0, children))
}

#[test]
fn picks_node_with_most_text() {
    let dom = page([
        NodeSpec::element("div").with_id("short").with_child(paragraph(150)),
        NodeSpec::element("article").with_id("long").with_child(paragraph(900)),
    ]);

    let region = ContentLocator::default().locate(&dom);

    // The <p> inside #long has the same text as #long itself, so the outer
    // node (found first) wins the tie.
    assert_eq!(region.node, by_id(&dom, "long"));
    assert_eq!(region.text_length, 900);
}

#[test]
fn falls_back_to_body_when_nothing_qualifies() {
    let dom = page([paragraph(100), paragraph(50)]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(
        region.node,
        dom.body(),
        "100 characters is not strictly more than the minimum"
    );
}

#[test]
fn empty_body_falls_back_to_body() {
    let dom = page(Vec::new());
    let region = ContentLocator::default().locate(&dom);
    assert_eq!(region.node, dom.body());
    assert_eq!(region.text_length, 0);
}

#[test]
fn length_is_measured_after_trimming() {
    let padded = format!("   {}   \n", text_of_len(100));
    let dom = page([NodeSpec::element("p").with_id("p").with_text(padded)]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, dom.body(), "surrounding whitespace must not count");
}

#[test]
fn length_counts_characters_not_bytes() {
    let dom = page([NodeSpec::element("p").with_id("p").with_text("가".repeat(60))]);
    let region = ContentLocator::default().locate(&dom);
    assert_eq!(region.node, dom.body(), "60 characters is below the threshold");
}

#[test]
fn skips_header_footer_and_nav_subtrees() {
    let dom = page([
        NodeSpec::element("header").with_child(
            NodeSpec::element("div")
                .with_id("in-header")
                .with_child(paragraph(5000)),
        ),
        NodeSpec::element("nav").with_child(paragraph(4000)),
        NodeSpec::element("footer").with_child(paragraph(3000)),
        NodeSpec::element("main").with_id("main").with_child(paragraph(200)),
    ]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, by_id(&dom, "main"));
}

#[test]
fn skips_script_style_and_noscript() {
    let dom = page([
        NodeSpec::element("script").with_text(text_of_len(5000)),
        NodeSpec::element("style").with_text(text_of_len(4000)),
        NodeSpec::element("noscript").with_text(text_of_len(3000)),
        NodeSpec::element("section").with_id("s").with_child(paragraph(150)),
    ]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, by_id(&dom, "s"));
}

#[test]
fn skips_hidden_and_collapsed_nodes() {
    let dom = page([
        NodeSpec::element("div")
            .with_display("none")
            .with_child(paragraph(5000)),
        NodeSpec::element("div")
            .with_visibility("hidden")
            .with_child(paragraph(4000)),
        NodeSpec::element("div")
            .with_size(0.0, 300.0)
            .with_child(NodeSpec::element("span").with_size(0.0, 0.0).with_text(text_of_len(3000))),
        NodeSpec::element("div").with_id("visible").with_child(paragraph(200)),
    ]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, by_id(&dom, "visible"));
}

#[test]
fn failing_queries_reject_only_that_candidate() {
    let mut dom = page([
        NodeSpec::element("div")
            .with_id("broken")
            .with_text(text_of_len(5000)),
        NodeSpec::element("div").with_id("ok").with_child(paragraph(300)),
    ]);
    let broken = by_id(&dom, "broken");
    dom.fail_queries_on(broken);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, by_id(&dom, "ok"));
}

#[test]
fn first_discovered_wins_on_equal_length() {
    let dom = page([
        NodeSpec::element("section").with_id("first").with_text(text_of_len(500)),
        NodeSpec::element("section").with_id("second").with_text(text_of_len(500)),
    ]);

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, by_id(&dom, "first"));
}

#[test]
fn body_itself_is_never_a_candidate() {
    // Body text alone would qualify, but the walk starts at its children.
    let dom = MemoryDom::new(DocumentSpec {
        body: NodeSpec::element("body").with_text(text_of_len(5000)),
        ..DocumentSpec::new(800.0, Vec::new())
    });

    let region = ContentLocator::default().locate(&dom);

    assert_eq!(region.node, dom.body());
    assert_eq!(region.text_length, 5000);
}

#[test]
fn custom_threshold_is_respected() {
    let dom = page([NodeSpec::element("p").with_id("p").with_text(text_of_len(30))]);
    let region = ContentLocator::new(20).locate(&dom);
    assert_eq!(region.node, by_id(&dom, "p"));
}

#[test]
fn evaluate_reports_rejection_reason() {
    let dom = page([
        NodeSpec::element("nav").with_child(NodeSpec::element("p").with_id("in-nav")),
        NodeSpec::element("p").with_id("short").with_text("tiny"),
    ]);
    let locator = ContentLocator::default();

    assert_eq!(
        locator.evaluate(&dom, by_id(&dom, "in-nav"), "p"),
        Err(Rejection::PageChrome)
    );
    assert_eq!(
        locator.evaluate(&dom, by_id(&dom, "short"), "p"),
        Err(Rejection::TooShort)
    );
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_node(depth: u32) -> BoxedStrategy<NodeSpec> {
        let tag = prop::sample::select(vec![
            "div", "p", "section", "article", "nav", "script", "span",
        ]);
        let leaf = (tag, 0usize..400, any::<bool>()).prop_map(|(tag, len, hidden)| {
            let node = NodeSpec::element(tag).with_text(text_of_len(len));
            if hidden {
                node.with_display("none")
            } else {
                node
            }
        });
        if depth == 0 {
            return leaf.boxed();
        }
        (leaf, prop::collection::vec(arb_node(depth - 1), 0..4))
            .prop_map(|(node, children)| node.with_children(children))
            .boxed()
    }

    proptest! {
        #[test]
        fn result_is_body_or_long_enough(children in prop::collection::vec(arb_node(3), 0..5)) {
            let dom = page(children);
            let region = ContentLocator::default().locate(&dom);
            let len = dom.text_content(region.node).unwrap().trim().chars().count();
            prop_assert!(region.node == dom.body() || len > DEFAULT_MIN_TEXT_LENGTH);
        }
    }
}
