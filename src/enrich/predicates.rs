//! Shared predicates for enrichment passes.

use crate::dom::{ArenaDom, NodeId};
use crate::engine::FootnotePair;
use crate::hooks;
use crate::util::normalize_whitespace;

/// Heading level of an h1–h3 element.
pub fn heading_level(dom: &ArenaDom, id: NodeId) -> Option<u8> {
    match dom.element_name(id).map(|n| n.as_ref()) {
        Some("h1") => Some(1),
        Some("h2") => Some(2),
        Some("h3") => Some(3),
        _ => None,
    }
}

/// Paragraphs that never take a number.
///
/// Media captions, bibliography entries and anything carrying the
/// configured exclusion class.
pub fn is_excluded_paragraph(dom: &ArenaDom, id: NodeId, exclusion_class: &str) -> bool {
    dom.has_class(id, hooks::MEDIA_CAPTION)
        || dom.has_class(id, hooks::BIBLIOGRAPHY)
        || dom.has_class(id, exclusion_class)
}

/// Text nodes consisting only of whitespace.
pub fn is_blank_text(dom: &ArenaDom, id: NodeId) -> bool {
    dom.text_content(id).is_some_and(|t| t.trim().is_empty())
}

/// Plain text of a footnote definition, without its backlink.
pub fn definition_text(dom: &ArenaDom, pair: &FootnotePair) -> String {
    let mut text = String::new();
    for node in dom.descendants(pair.definition) {
        if let Some(backlink) = pair.backlink
            && (node == backlink || dom.is_ancestor(backlink, node))
        {
            continue;
        }
        if let Some(content) = dom.text_content(node) {
            text.push_str(content);
        }
    }
    normalize_whitespace(&text)
}

/// Visible text of a heading, leaving out footnote reference markers and
/// tooltip text.
pub fn heading_text(dom: &ArenaDom, heading: NodeId, footnotes: &[FootnotePair]) -> String {
    let hidden = |node: NodeId| {
        let mut current = node;
        while current.is_some() && current != heading {
            if dom.has_class(current, hooks::TOOLTIP_TEXT)
                || footnotes.iter().any(|pair| pair.reference == current)
            {
                return true;
            }
            current = dom.parent(current);
        }
        false
    };

    let mut text = String::new();
    for node in dom.descendants(heading) {
        if let Some(content) = dom.text_content(node)
            && !hidden(node)
        {
            text.push_str(content);
        }
    }
    normalize_whitespace(&text)
}

/// The tooltip text span built next to a footnote reference, if any.
pub fn tooltip_text_of(dom: &ArenaDom, reference: NodeId) -> Option<NodeId> {
    let tooltip = dom.parent(reference);
    if !dom.has_class(tooltip, hooks::TOOLTIP) {
        return None;
    }
    dom.element_children(tooltip)
        .into_iter()
        .find(|&child| dom.has_class(child, hooks::TOOLTIP_TEXT))
}

/// Footnote reference text without the engine's brackets: `[12]` becomes `12`.
pub fn strip_brackets(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(trimmed)
}
