//! Pass 7: Paragraph numbers

use crate::dom::{ArenaDom, NodeId};

use super::predicates::is_excluded_paragraph;

/// Prefix eligible paragraphs and all blockquotes with `[N] `.
///
/// Eligible paragraphs are the top-level `<p>` children of `root` that are
/// not excluded; blockquotes are numbered wherever they sit. Excluded
/// paragraphs do not consume a number. A paragraph holding only a space is
/// still numbered.
pub fn number(dom: &mut ArenaDom, root: NodeId, exclusion_class: &str) -> usize {
    let targets = dom.find_all(root, |dom, id| {
        if dom.is_tag(id, "blockquote") {
            return true;
        }
        dom.is_tag(id, "p")
            && dom.parent(id) == root
            && !is_excluded_paragraph(dom, id, exclusion_class)
    });

    let mut counter = 0;
    for node in targets {
        counter += 1;
        let prefix = format!("[{counter}] ");
        let target = text_host(dom, node);
        dom.prepend_text(target, &prefix);
    }

    log::debug!("paragraph numbers: {counter} assigned");
    counter
}

/// A blockquote wrapping paragraphs carries its number in the first one.
fn text_host(dom: &ArenaDom, node: NodeId) -> NodeId {
    if !dom.is_tag(node, "blockquote") {
        return node;
    }
    let leading_text = dom
        .children(node)
        .take_while(|&child| !dom.is_element(child))
        .any(|child| dom.text_content(child).is_some_and(|t| !t.trim().is_empty()));
    match dom.element_children(node).first() {
        Some(&first) if !leading_text && dom.is_tag(first, "p") => first,
        _ => node,
    }
}
