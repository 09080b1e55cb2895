//! Pass 8: Soft wraps
//!
//! Long URLs in narrow columns overflow unless the browser is allowed to
//! break them. A `<wbr>` is placed after every `/` in link text, tooltip
//! text and footnote definitions, except after a slash that ends the run.
//! The href values themselves are left alone.

use std::collections::HashSet;

use crate::dom::{ArenaDom, NodeId};
use crate::hooks;

use super::Document;

/// Insert soft wraps in every link and footnote-related run of `doc`.
pub fn wrap(doc: &mut Document) -> usize {
    let mut hosts = doc.dom.find_all(doc.body, |dom, id| {
        dom.is_tag(id, "a") || dom.has_class(id, hooks::TOOLTIP_TEXT)
    });
    hosts.extend(doc.footnotes.iter().map(|pair| pair.definition));

    let inserted = wrap_hosts(&mut doc.dom, &hosts);
    log::debug!("soft wraps: {inserted} inserted");
    inserted
}

/// Insert soft wraps in all text under `root`.
pub fn insert_soft_wraps(dom: &mut ArenaDom, root: NodeId) -> usize {
    wrap_hosts(dom, &[root])
}

fn wrap_hosts(dom: &mut ArenaDom, hosts: &[NodeId]) -> usize {
    let mut seen = HashSet::new();
    let mut texts = Vec::new();
    for &host in hosts {
        for node in dom.find_all(host, |dom, id| dom.is_text(id)) {
            if seen.insert(node) {
                texts.push((node, host));
            }
        }
    }

    texts
        .into_iter()
        .map(|(text, host)| split_after_slashes(dom, text, host))
        .sum()
}

/// Put a marker after each `/` in a text node that has content after it.
///
/// Slashes inside the node split it. A slash ending the node is marked only
/// when more content follows inside `host` and the next sibling is not
/// already a marker, so a second run is a no-op and a trailing slash stays
/// unmarked.
fn split_after_slashes(dom: &mut ArenaDom, text: NodeId, host: NodeId) -> usize {
    let Some(content) = dom.text_content(text) else {
        return 0;
    };

    let mut pieces: Vec<String> = Vec::new();
    let mut start = 0;
    for (pos, _) in content.match_indices('/') {
        let end = pos + 1;
        if end < content.len() {
            pieces.push(content[start..end].to_string());
            start = end;
        }
    }
    pieces.push(content[start..].to_string());
    let ends_with_slash = content.ends_with('/');

    let mut inserted = 0;
    let mut cursor = text;
    if pieces.len() > 1 {
        dom.set_text(text, pieces[0].as_str());
        for piece in &pieces[1..] {
            let marker = dom.element("wbr", &[]);
            dom.insert_after(cursor, marker);
            let next = dom.create_text(piece.as_str());
            dom.insert_after(marker, next);
            cursor = next;
            inserted += 1;
        }
    }

    if ends_with_slash
        && let Some(following) = following_content(dom, cursor, host)
        && !dom.is_tag(following, "wbr")
    {
        let marker = dom.element("wbr", &[]);
        dom.insert_after(cursor, marker);
        inserted += 1;
    }
    inserted
}

/// The node rendered right after `node` without leaving `host`.
fn following_content(dom: &ArenaDom, node: NodeId, host: NodeId) -> Option<NodeId> {
    let mut current = node;
    while current.is_some() && current != host {
        let next = dom.next_sibling(current);
        if next.is_some() {
            return Some(next);
        }
        current = dom.parent(current);
    }
    None
}
