//! Pass 3: Heading ids

use std::collections::HashSet;

use crate::dom::{ArenaDom, NodeId};
use crate::engine::FootnotePair;

use super::predicates::{heading_level, heading_text};

/// Id used when a heading has no usable text.
const FALLBACK_SLUG: &str = "heading";

/// Convert heading text to an id.
///
/// Lowercases, keeps alphanumeric characters and collapses every other run
/// into a single `-`. Leading and trailing separators are dropped.
pub fn slugify(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Give every h1–h3 under `root` a document-unique slug id.
///
/// Ids already used elsewhere in the document (footnotes, anchors) are
/// reserved first; collisions get `-1`, `-2`, … appended. Footnote markers
/// inside a heading do not count towards its slug.
pub fn assign_ids(dom: &mut ArenaDom, root: NodeId, footnotes: &[FootnotePair]) -> usize {
    let headings = dom.find_all(root, |dom, id| heading_level(dom, id).is_some());

    let mut used: HashSet<String> = dom
        .find_all(root, |dom, id| {
            dom.element_id(id).is_some() && heading_level(dom, id).is_none()
        })
        .into_iter()
        .filter_map(|id| dom.element_id(id).map(str::to_string))
        .collect();

    for &heading in &headings {
        let mut base = slugify(&heading_text(dom, heading, footnotes));
        if base.is_empty() {
            log::debug!("heading without text; using '{FALLBACK_SLUG}'");
            base = FALLBACK_SLUG.to_string();
        }
        let id = unique_id(&base, &used);
        used.insert(id.clone());
        dom.set_attr(heading, "id", id);
    }

    log::debug!("heading ids: {} assigned", headings.len());
    headings.len()
}

/// Every id carried by an element under `root`.
pub fn document_ids(dom: &ArenaDom, root: NodeId) -> HashSet<String> {
    dom.descendants(root)
        .into_iter()
        .filter_map(|id| dom.element_id(id).map(str::to_string))
        .collect()
}

/// `base`, or `base-N` with the smallest N not in `used`.
pub fn unique_id(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
