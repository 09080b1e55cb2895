//! Pass 10: Table captions
//!
//! Word keeps a table caption as a paragraph next to the table. Once mapped to
//! `<caption>` it has to live inside the table to be valid markup.

use crate::dom::{ArenaDom, NodeId};

/// Move each stray caption into the table before it, or else after it.
pub fn relocate(dom: &mut ArenaDom, root: NodeId) -> usize {
    let captions = dom.find_all(root, |dom, id| {
        dom.is_tag(id, "caption") && dom.closest(dom.parent(id), "table").is_none()
    });

    let mut moved = 0;
    for caption in captions {
        let table = dom
            .prev_element_sibling(caption)
            .filter(|&prev| dom.is_tag(prev, "table"))
            .or_else(|| {
                dom.next_element_sibling(caption)
                    .filter(|&next| dom.is_tag(next, "table"))
            });
        let Some(table) = table else {
            log::warn!("caption '{}' has no adjacent table; left in place", dom.text(caption).trim());
            continue;
        };

        // After any caption already moved in, so their order is kept.
        let anchor = dom
            .element_children(table)
            .into_iter()
            .find(|&child| !dom.is_tag(child, "caption"));
        match anchor {
            Some(anchor) => dom.insert_before(anchor, caption),
            None => dom.append(table, caption),
        }
        moved += 1;
    }

    log::debug!("table captions: {moved} moved");
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    #[test]
    fn test_caption_after_table_moves_in_first() {
        let mut parsed = parse_fragment(
            "<table><tr><td>1</td></tr></table><caption>Table 1</caption><p>after</p>",
        );
        assert_eq!(relocate(&mut parsed.dom, parsed.body), 1);

        let table = parsed.dom.find_all_by_tag(parsed.body, "table")[0];
        let first = parsed.dom.element_children(table)[0];
        assert!(parsed.dom.is_tag(first, "caption"));
        assert_eq!(parsed.dom.element_children(parsed.body).len(), 2);
    }

    #[test]
    fn test_caption_before_table() {
        let mut parsed = parse_fragment("<caption>Above</caption><table><tr><td>1</td></tr></table>");
        assert_eq!(relocate(&mut parsed.dom, parsed.body), 1);
        let html = serialize_children(&parsed.dom, parsed.body);
        assert!(html.starts_with("<table>"), "{html}");
    }

    #[test]
    fn test_multiple_captions_keep_order() {
        let mut parsed = parse_fragment(
            "<table><tr><td>1</td></tr></table><caption>A</caption><caption>B</caption>",
        );
        assert_eq!(relocate(&mut parsed.dom, parsed.body), 2);
        let table = parsed.dom.find_all_by_tag(parsed.body, "table")[0];
        let texts: Vec<String> = parsed
            .dom
            .element_children(table)
            .into_iter()
            .filter(|&c| parsed.dom.is_tag(c, "caption"))
            .map(|c| parsed.dom.text(c))
            .collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn test_lonely_caption_stays() {
        let mut parsed = parse_fragment("<p>x</p><caption>Orphan</caption>");
        assert_eq!(relocate(&mut parsed.dom, parsed.body), 0);
    }
}
