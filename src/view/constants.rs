//! Style and geometry constants for injected controls.
//!
//! Centralized so tests and the web adapter agree on ids and positions.
//! Declarations are applied one property at a time through [`crate::dom::Dom::set_style`].

/// Inline style declarations as `(property, value)` pairs.
pub type Declarations = &'static [(&'static str, &'static str)];

/// `id` of the e-ink override stylesheet.
pub const EINK_STYLE_ID: &str = "eink-mode";

/// Body of the e-ink override stylesheet.
pub const EINK_CSS: &str = "\
body, article, main, .content, #content {
  background: white !important;
  color: black !important;
  font-weight: normal !important;
}
img {
  filter: grayscale(100%) !important;
}
";

/// Default width of the focused column in CSS pixels.
pub const FOCUSED_COLUMN_WIDTH: u32 = 800;

/// Typography applied to the content region in both layout modes.
pub const READING_TYPOGRAPHY: Declarations = &[
    ("font-size", "16px"),
    ("line-height", "1.6"),
    ("word-break", "break-word"),
];

/// Box properties on the region in full-width mode.
pub const FULL_WIDTH_REGION: Declarations = &[
    ("width", "100%"),
    ("max-width", "none"),
    ("margin", "0"),
    ("padding", "0"),
];

/// Box properties on each ancestor (and the body) in full-width mode.
pub const FULL_WIDTH_ANCESTOR: Declarations = &[
    ("max-width", "none"),
    ("width", "100%"),
    ("margin", "0"),
    ("padding", "0"),
];

/// Properties reset on ancestors when leaving full-width mode.
pub const ANCESTOR_RESET: &[&str] = &["max-width", "width", "margin", "padding"];

/// Padding around the focused column.
pub const FOCUSED_PADDING: &str = "20px";

/// Images inside the focused column shrink to fit it.
pub const FOCUSED_IMAGE: Declarations = &[
    ("max-width", "100%"),
    ("height", "auto"),
    ("display", "block"),
    ("margin", "20px auto"),
];

/// Shared look of the previous/next buttons.
pub const NAV_BUTTON_BASE: Declarations = &[
    ("position", "fixed"),
    ("z-index", "10000"),
    ("padding", "20px"),
    ("background", "rgba(255, 255, 255, 0.8)"),
    ("border", "none"),
    ("cursor", "pointer"),
    ("transform", "translateY(-50%)"),
    ("touch-action", "manipulation"),
    ("user-select", "none"),
    ("transition", "opacity 0.3s ease"),
    ("font-size", "24px"),
    ("width", "50px"),
    ("height", "50px"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("border-radius", "25px"),
];

/// Previous-button label.
pub const PREV_LABEL: &str = "\u{2190}";
/// Next-button label.
pub const NEXT_LABEL: &str = "\u{2192}";

/// Distance of the buttons from the viewport edge.
pub const NAV_EDGE_OFFSET: &str = "10px";
/// Vertical position when buttons sit on opposite edges.
pub const NAV_CENTER_TOP: &str = "50%";
/// Previous-button position when stacked on the right.
pub const NAV_STACKED_PREV_TOP: &str = "calc(50% - 35px)";
/// Next-button position when stacked on the right.
pub const NAV_STACKED_NEXT_TOP: &str = "calc(50% + 35px)";

/// Settings panel container.
pub const PANEL_STYLE: Declarations = &[
    ("position", "fixed"),
    ("bottom", "70px"),
    ("right", "20px"),
    ("background", "rgba(255, 255, 255, 0.7)"),
    ("padding", "10px"),
    ("border-radius", "8px"),
    ("z-index", "10001"),
    ("flex-direction", "column"),
    ("gap", "10px"),
    ("align-items", "flex-start"),
    ("font-family", "Arial, sans-serif"),
    ("font-size", "14px"),
];

/// Gear button that opens the settings panel.
pub const GEAR_STYLE: Declarations = &[
    ("position", "fixed"),
    ("bottom", "20px"),
    ("right", "20px"),
    ("background", "rgba(255, 255, 255, 0.5)"),
    ("border", "none"),
    ("border-radius", "50%"),
    ("width", "40px"),
    ("height", "40px"),
    ("cursor", "pointer"),
    ("z-index", "10002"),
    ("font-size", "20px"),
];

/// Gear button label.
pub const GEAR_LABEL: &str = "\u{2699}\u{fe0f}";

/// One switch row: label text followed by the switch.
pub const SWITCH_ROW_STYLE: Declarations =
    &[("display", "flex"), ("align-items", "center"), ("gap", "8px")];

/// Switch track (the `<label>` wrapping input and slider).
pub const SWITCH_TRACK_STYLE: Declarations = &[
    ("position", "relative"),
    ("display", "inline-block"),
    ("width", "40px"),
    ("height", "20px"),
];

/// The real checkbox is invisible; the slider draws the state.
pub const SWITCH_INPUT_STYLE: Declarations = &[("opacity", "0"), ("width", "0"), ("height", "0")];

/// Slider background.
pub const SWITCH_SLIDER_STYLE: Declarations = &[
    ("position", "absolute"),
    ("cursor", "pointer"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("bottom", "0"),
    ("background-color", "#ccc"),
    ("transition", ".4s"),
    ("border-radius", "34px"),
];

/// Slider knob.
pub const SWITCH_KNOB_STYLE: Declarations = &[
    ("position", "absolute"),
    ("height", "16px"),
    ("width", "16px"),
    ("left", "2px"),
    ("bottom", "2px"),
    ("background-color", "white"),
    ("transition", ".4s"),
    ("border-radius", "50%"),
];

/// Knob transform when the switch is on.
pub const KNOB_ON: &str = "translateX(20px)";
/// Knob transform when the switch is off.
pub const KNOB_OFF: &str = "translateX(0)";

/// In-page notice banner.
pub const NOTICE_STYLE: Declarations = &[
    ("position", "fixed"),
    ("top", "20px"),
    ("left", "50%"),
    ("transform", "translateX(-50%)"),
    ("background", "rgba(0, 0, 0, 0.7)"),
    ("color", "white"),
    ("padding", "12px 24px"),
    ("border-radius", "8px"),
    ("font-family", "Arial, sans-serif"),
    ("font-size", "16px"),
    ("z-index", "10001"),
    ("opacity", "1"),
    ("transition", "opacity 0.3s ease"),
];

/// Apply every declaration in `declarations` to `node`.
pub fn apply<D: crate::dom::Dom + ?Sized>(
    dom: &mut D,
    node: crate::dom::NodeId,
    declarations: Declarations,
    important: bool,
) {
    for (property, value) in declarations {
        dom.set_style(node, property, value, important);
    }
}
