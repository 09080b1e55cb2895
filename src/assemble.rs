//! Final document shell.
//!
//! The enriched content always ends up in
//! `<body><div class="gridContainer">[navGrid]<div class="mainGrid">…</div></div></body>`.
//! Full documents add a doctype and a head with charset, optional title,
//! optional stylesheet and, at the end of the body, the optional script.

use crate::config::Options;
use crate::dom::{NodeId, serialize_node};
use crate::enrich::Document;
use crate::hooks;

/// Wrap the content in its shell and serialize it.
///
/// `options` should already be [`normalized`](Options::normalized).
pub fn assemble(doc: &mut Document, options: &Options) -> String {
    let body = build_body(doc);

    if options.body_only {
        log::debug!("assembling body-only fragment");
        return serialize_node(&doc.dom, body);
    }

    let dom = &mut doc.dom;
    let document = dom.document();
    for child in dom.child_vec(document) {
        dom.detach(child);
    }

    let doctype = dom.create_doctype("html".to_string(), String::new(), String::new());
    dom.append(document, doctype);
    let html = dom.element("html", &[]);
    dom.append(document, html);

    let head = dom.element("head", &[]);
    dom.append(html, head);
    let meta = dom.element("meta", &[("charset", "UTF-8")]);
    dom.append(head, meta);

    if let Some(title) = options.page_title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let title_el = dom.element("title", &[]);
        dom.append_text(title_el, title);
        dom.append(head, title_el);
    }

    if options.insert_css {
        let style = dom.element("style", &[]);
        dom.append_text(style, &format!("\n{}", hooks::COMPANION_CSS));
        dom.append(head, style);
    }

    dom.append(html, body);

    if options.insert_script {
        let script = dom.element("script", &[]);
        dom.append_text(script, &format!("\n{}", hooks::SCROLL_HIGHLIGHT_JS));
        dom.append(body, script);
    }

    log::debug!(
        "assembling full document (css: {}, script: {}, title: {})",
        options.insert_css,
        options.insert_script,
        options.page_title.is_some()
    );
    serialize_node(&doc.dom, document)
}

/// Move the content into a fresh `<body>` with the grid wrappers.
fn build_body(doc: &mut Document) -> NodeId {
    let dom = &mut doc.dom;
    let body = dom.element("body", &[]);
    let grid = dom.element("div", &[("class", hooks::GRID_CONTAINER)]);
    dom.append(body, grid);

    if let Some(navigation) = doc.navigation {
        dom.append(grid, navigation);
    }

    let main = dom.element("div", &[("class", hooks::MAIN_GRID)]);
    dom.append(grid, main);
    dom.reparent_children(doc.body, main);
    doc.body = main;
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Conversion;

    fn document(markup: &str) -> Document {
        Conversion::from_markup(markup).unwrap().into()
    }

    #[test]
    fn test_body_only_shell() {
        let mut doc = document("<p>Hello</p>");
        let html = assemble(&mut doc, &Options::default());
        assert!(html.starts_with("<body>"), "{html}");
        assert!(!html.contains("<!DOCTYPE"));
        assert!(!html.contains("<head>"));

        let grid = html.find(r#"<div class="gridContainer">"#).unwrap();
        let main = html.find(r#"<div class="mainGrid">"#).unwrap();
        let para = html.find("<p>Hello</p>").unwrap();
        assert!(grid < main && main < para, "{html}");
    }

    #[test]
    fn test_full_document_head() {
        let mut doc = document("<p>Hello</p>");
        let options = Options {
            body_only: false,
            insert_css: true,
            insert_script: true,
            page_title: Some("A & B".to_string()),
            ..Options::default()
        }
        .normalized();
        let html = assemble(&mut doc, &options);

        assert!(html.starts_with("<!DOCTYPE html>\n<html>"), "{html}");
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains("<title>A &amp; B</title>"), "{html}");
        assert!(html.contains(".tooltiptext"));
        assert!(html.contains("navActive"));
        let script = html.find("<script>").unwrap();
        assert!(script > html.find("<p>Hello</p>").unwrap());
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_navigation_precedes_main_column() {
        let mut doc = document("<h1>One</h1>");
        let options = Options {
            navigation: true,
            ..Options::default()
        };
        crate::enrich::enrich(&mut doc, &options);
        let html = assemble(&mut doc, &options);
        let nav = html.find(r#"<div class="navGrid">"#).unwrap();
        let main = html.find(r#"<div class="mainGrid">"#).unwrap();
        assert!(nav < main, "{html}");
    }

    #[test]
    fn test_full_document_without_title() {
        let mut doc = document("<p>x</p>");
        let options = Options {
            body_only: false,
            ..Options::default()
        };
        let html = assemble(&mut doc, &options);
        assert!(!html.contains("<title>"));
        assert!(!html.contains("<style>"));
    }
}
