//! Pass 4: Navigation
//!
//! One entry per identified heading, nested by level. The navigation column
//! is built detached from the content and attached by the assembler.

use crate::config::NavigationStyle;
use crate::dom::{ArenaDom, NodeId};
use crate::engine::FootnotePair;
use crate::hooks;

use super::predicates::{heading_level, heading_text};

/// One navigation entry and the entries nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub target_id: String,
    pub label: String,
    pub level: u8,
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn href(&self) -> String {
        format!("#{}", self.target_id)
    }
}

/// Collect h1–h3 headings under `root` into a nested item tree.
///
/// A deeper level nests one step under the previous entry, whatever the size
/// of the jump; a shallower level closes back to the matching depth. Labels
/// leave out footnote markers.
pub fn collect_items(dom: &ArenaDom, root: NodeId, footnotes: &[FootnotePair]) -> Vec<NavItem> {
    let mut roots: Vec<NavItem> = Vec::new();
    let mut open: Vec<NavItem> = Vec::new();

    for heading in dom.find_all(root, |dom, id| heading_level(dom, id).is_some()) {
        let Some(level) = heading_level(dom, heading) else {
            continue;
        };
        let Some(target_id) = dom.element_id(heading) else {
            log::warn!("heading without id left out of navigation");
            continue;
        };

        while open.last().is_some_and(|top| top.level >= level) {
            close_top(&mut open, &mut roots);
        }
        open.push(NavItem {
            target_id: target_id.to_string(),
            label: heading_text(dom, heading, footnotes),
            level,
            children: Vec::new(),
        });
    }

    while !open.is_empty() {
        close_top(&mut open, &mut roots);
    }
    roots
}

fn close_top(open: &mut Vec<NavItem>, roots: &mut Vec<NavItem>) {
    if let Some(done) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Number of entries in an item tree.
pub fn count(items: &[NavItem]) -> usize {
    items.iter().map(|item| 1 + count(&item.children)).sum()
}

/// Build the detached navigation column.
///
/// Returns `None` when there is nothing to navigate to.
pub fn render(dom: &mut ArenaDom, items: &[NavItem], style: NavigationStyle) -> Option<NodeId> {
    if items.is_empty() {
        log::debug!("navigation: no headings, omitted");
        return None;
    }

    let column = dom.element("div", &[("class", hooks::NAV_GRID)]);
    let comment = dom.create_comment(" Navigation ");
    dom.append(column, comment);

    let title = dom.element("h1", &[]);
    dom.append_text(title, "Navigation");
    dom.append(column, title);

    let nav = dom.element("nav", &[]);
    dom.append(column, nav);
    render_level(dom, nav, items, style);

    log::debug!("navigation: {} entries", count(items));
    Some(column)
}

fn render_level(dom: &mut ArenaDom, container: NodeId, items: &[NavItem], style: NavigationStyle) {
    let tag = match style {
        NavigationStyle::Paragraph => "p",
        NavigationStyle::Button => "button",
    };

    for item in items {
        let entry = dom.element(tag, &[]);
        let href = item.href();
        let link = dom.element("a", &[("href", href.as_str())]);
        dom.append_text(link, &item.label);
        dom.append(entry, link);
        dom.append(container, entry);

        if !item.children.is_empty() {
            let level = dom.element("div", &[("class", hooks::NAV_LEVEL)]);
            dom.append(container, level);
            render_level(dom, level, &item.children, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_node};
    use crate::enrich::headings::assign_ids;

    fn items_for(markup: &str) -> (crate::dom::ParsedFragment, Vec<NavItem>) {
        let mut parsed = parse_fragment(markup);
        assign_ids(&mut parsed.dom, parsed.body, &[]);
        let items = collect_items(&parsed.dom, parsed.body, &[]);
        (parsed, items)
    }

    #[test]
    fn test_duplicate_top_level_headings() {
        let (_, items) = items_for("<h1>Intro</h1><p>x</p><h1>Intro</h1>");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].href(), "#intro");
        assert_eq!(items[1].href(), "#intro-1");
    }

    #[test]
    fn test_nesting_follows_levels() {
        let (_, items) = items_for(
            "<h1>A</h1><h2>A1</h2><h3>A1a</h3><h2>A2</h2><h1>B</h1><h3>B deep</h3>",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 2);
        assert_eq!(items[0].children[0].children[0].label, "A1a");
        assert_eq!(items[1].children[0].label, "B deep");
        assert_eq!(count(&items), 6);
    }

    #[test]
    fn test_leading_subheading_is_top_level() {
        let (_, items) = items_for("<h2>Preface</h2><h1>Main</h1>");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.children.is_empty()));
    }

    #[test]
    fn test_render_paragraph_and_button() {
        let (mut parsed, items) = items_for("<h1>Intro</h1><h2>Scope</h2>");

        let column = render(&mut parsed.dom, &items, NavigationStyle::Paragraph).unwrap();
        let html = serialize_node(&parsed.dom, column);
        assert!(html.contains(r##"<div class="navGrid">"##));
        assert!(html.contains("<!-- Navigation -->"));
        assert!(html.contains("<h1>Navigation</h1>"));
        assert!(html.contains(r##"<p><a href="#intro">Intro</a></p>"##), "{html}");
        assert!(html.contains(r##"<div class="navLevel">"##));

        let column = render(&mut parsed.dom, &items, NavigationStyle::Button).unwrap();
        let html = serialize_node(&parsed.dom, column);
        assert!(html.contains(r##"<button><a href="#scope">Scope</a></button>"##), "{html}");
    }

    #[test]
    fn test_no_headings_no_navigation() {
        let (mut parsed, items) = items_for("<p>Only text</p>");
        assert!(items.is_empty());
        assert!(render(&mut parsed.dom, &items, NavigationStyle::Paragraph).is_none());
    }
}
