//! Acceptance tests: full reading sessions over a realistic page.
//!
//! Drives the public API the way a host would: readiness, load, then a stream
//! of user actions and timer firings.

use ereader_view::config::ResolvedConfig;
use ereader_view::dom::{Dom, MemoryDom};
use ereader_view::model::{LayoutMode, PreferenceToggle};
use ereader_view::reader::Phase;
use ereader_view::simulate::{parse_script, Simulation};
use ereader_view::PageTurn;

const ARTICLE: &str = include_str!("fixtures/article.json");

fn page() -> MemoryDom {
    MemoryDom::from_json(ARTICLE).expect("fixture should parse")
}

fn start() -> Simulation {
    Simulation::start(page(), ResolvedConfig::default())
}

fn run(sim: &mut Simulation, script: &str) -> ereader_view::simulate::StepReport {
    let steps = parse_script(script).expect("script should parse");
    let report = sim.run_script(&steps);
    report.steps.last().cloned().unwrap_or(report.initial)
}

// ===== Setup =====

#[test]
fn us1_reader_initializes_once_the_page_has_loaded() {
    // GIVEN: a page still reporting readyState "loading"
    // WHEN: the load event arrives
    let sim = start();

    // THEN: the reader is active on the article body, page 1 of 4
    let reader = sim.reader();
    assert_eq!(reader.phase(), Phase::Active);
    let main = reader.dom().element_by_id("main").unwrap();
    assert_eq!(reader.region().map(|r| r.node), Some(main));
    let state = reader.page_state().unwrap();
    assert_eq!((state.current_page(), state.total_pages()), (0, 4));
}

#[test]
fn us1_page_chrome_and_hidden_promos_are_never_chosen() {
    let sim = start();
    let region = sim.reader().region().unwrap();
    let dom = sim.reader().dom();

    assert_ne!(Some(region.node), dom.element_by_id("promo"));
    assert_eq!(dom.tag_name(region.node), "main");
}

// ===== Paging =====

#[test]
fn us2_paging_to_the_end_clamps_the_last_offset() {
    let mut sim = start();

    let last = run(&mut sim, "next next next");

    assert_eq!(last.page, Some(3));
    assert_eq!(last.scroll_y, 1360.0);
    assert_eq!(sim.reader().dom().scroll_log(), &[640.0, 1280.0, 1360.0]);
}

#[test]
fn us2_boundaries_show_notices_and_do_not_scroll() {
    let mut sim = start();

    let first = run(&mut sim, "prev");
    assert_eq!(first.notice.as_deref(), Some("First page"));
    assert_eq!(first.scroll_y, 0.0);

    let last = run(&mut sim, "next next next next");
    assert_eq!(last.page, Some(3));
    assert_eq!(last.notice.as_deref(), Some("Last page"));
    assert_eq!(sim.reader().dom().scroll_log().len(), 3);
}

#[test]
fn us2_arrow_keys_and_buttons_agree() {
    let mut sim = start();

    let report = run(&mut sim, "key:ArrowRight click:next key:ArrowLeft");

    assert_eq!(report.page, Some(1));
    assert_eq!(report.scroll_y, 640.0);
}

// ===== Layout =====

#[test]
fn us3_focused_column_repaginates_taller_content() {
    let mut sim = start();

    let report = run(&mut sim, "next next toggle:layout");

    assert_eq!(report.layout, Some(LayoutMode::Focused));
    assert_eq!(report.total_pages, Some(5));
    assert_eq!(report.page, Some(2), "Focused mode has more pages; page is kept");
    assert_eq!(report.notice.as_deref(), Some("Switched to focused mode"));
}

#[test]
fn us3_configured_focused_start() {
    let config = ResolvedConfig {
        full_width: false,
        ..ResolvedConfig::default()
    };
    let sim = Simulation::start(page(), config);

    let state = sim.reader().page_state().unwrap();
    assert_eq!(state.total_pages(), 5);
}

// ===== Controls =====

#[test]
fn us4_keyboard_toggle_blocks_arrows_until_reenabled() {
    let mut sim = start();

    let report = run(&mut sim, "toggle:keyboard key:ArrowRight key:ArrowRight");
    assert_eq!(report.page, Some(0));
    assert_eq!(report.notice.as_deref(), Some("Keyboard control disabled"));

    let report = run(&mut sim, "key:k key:ArrowRight");
    assert_eq!(report.page, Some(1));
}

#[test]
fn us4_buttons_reappear_on_movement_and_hide_again() {
    let mut sim = start();

    let hidden = run(&mut sim, "key:h");
    assert_eq!(hidden.buttons_visible, Some(false));

    let shown = run(&mut sim, "mouse wait:1000 mouse wait:1999");
    assert_eq!(shown.buttons_visible, Some(true));

    let rehidden = run(&mut sim, "wait:1");
    assert_eq!(rehidden.buttons_visible, Some(false));
}

#[test]
fn us4_settings_gear_opens_the_panel() {
    let mut sim = start();
    assert!(run(&mut sim, "click:gear").panel_open);
    assert!(!run(&mut sim, "click:gear").panel_open);
}

// ===== Resize =====

#[test]
fn us5_resize_storm_recomputes_once_after_settling() {
    let mut sim = start();
    run(&mut sim, "next next");

    let during = run(&mut sim, "resize:900 wait:100 resize:950 wait:100 resize:1000 wait:249");
    assert_eq!(during.total_pages, Some(4), "Still debouncing");

    let after = run(&mut sim, "wait:1");
    assert_eq!(after.total_pages, Some(3));
    assert_eq!(after.page, Some(1));
    assert_eq!(after.scroll_y, 800.0);
}

#[test]
fn us5_manual_scroll_is_respected_after_resize() {
    let mut sim = start();

    let report = run(&mut sim, "scroll:1300 resize:800 wait:250");

    assert_eq!(report.page, Some(2), "floor(1300 / 640) = 2");
    assert_eq!(report.scroll_y, 1280.0);
}

// ===== E-ink and teardown =====

#[test]
fn us6_eink_toggles_and_unload_leaves_page_clean() {
    let mut sim = start();

    let on = run(&mut sim, "eink");
    assert!(on.eink);
    assert!(sim.reader().dom().element_by_id("eink-mode").is_some());

    let gone = run(&mut sim, "prev mouse key:h resize:700 unload");
    assert_eq!(gone.phase, Phase::Disposed);

    let dom = sim.reader().dom();
    assert_eq!(dom.listener_count(), 0);
    assert!(dom.injected_nodes().is_empty());
    assert!(dom.element_by_id("eink-mode").is_none());
    assert_eq!(sim.reader().scheduler().pending_count(), 0);
}

#[test]
fn us6_host_entry_points_are_safe_before_setup() {
    let mut reader = ereader_view::Reader::new(
        page(),
        ereader_view::schedule::ManualScheduler::new(),
        ResolvedConfig::default(),
    );

    assert_eq!(reader.next_page(), PageTurn::Ignored);
    assert!(!reader.toggle_eink_mode());
    reader.set_preference(PreferenceToggle::Layout, false);

    assert_eq!(reader.phase(), Phase::Pending);
    assert!(reader.last_notice().is_none());
}
