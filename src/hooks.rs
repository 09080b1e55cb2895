//! Class names shared between the generated markup and the companion assets.
//!
//! The stylesheet and the scroll-highlight script select on exactly these
//! names, so they must not drift from what the passes emit.

/// Wrapper around a footnote reference that reveals its tooltip on hover.
pub const TOOLTIP: &str = "tooltip";
/// Hidden element holding the footnote text inside a [`TOOLTIP`].
pub const TOOLTIP_TEXT: &str = "tooltiptext";

/// Two-column layout container.
pub const GRID_CONTAINER: &str = "gridContainer";
/// Sticky navigation column.
pub const NAV_GRID: &str = "navGrid";
/// Content column.
pub const MAIN_GRID: &str = "mainGrid";
/// Nested navigation level.
pub const NAV_LEVEL: &str = "navLevel";
/// Set by the scroll script on the entry of the heading in view.
pub const NAV_ACTIVE: &str = "navActive";

/// Page-start marker.
pub const PAGE_NUMBER: &str = "pagenumber";
pub const MEDIA_CAPTION: &str = "mediacaption";
pub const BIBLIOGRAPHY: &str = "bibliography";

/// Stylesheet embedded by `insert_css`.
pub const COMPANION_CSS: &str = include_str!("../assets/companion.css");

/// Script embedded by `insert_script`.
pub const SCROLL_HIGHLIGHT_JS: &str = include_str!("../assets/scroll-highlight.js");
