//! Pass 2: Word bookmark cleanup

use crate::dom::{ArenaDom, NodeId};

const BOOKMARK_PREFIXES: &[&str] = &["_Toc", "_heading"];

/// Unwrap the bookmark anchors Word leaves in headings and TOC entries.
///
/// These are `<a id="_Toc…">` / `<a id="_heading…">` without an href. Their
/// content stays in place; the anchor goes.
pub fn remove_bookmarks(dom: &mut ArenaDom, root: NodeId) -> usize {
    let anchors = dom.find_all(root, |dom, id| {
        dom.is_tag(id, "a")
            && dom.get_attr(id, "href").is_none()
            && dom
                .element_id(id)
                .is_some_and(|v| BOOKMARK_PREFIXES.iter().any(|p| v.starts_with(p)))
    });

    for &anchor in &anchors {
        dom.unwrap(anchor);
    }

    log::debug!("bookmarks: {} anchors removed", anchors.len());
    anchors.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    #[test]
    fn test_unwraps_bookmarks_only() {
        let mut parsed = parse_fragment(concat!(
            r##"<h1><a id="_Toc123"/>Intro</h1>"##,
            r##"<h1><a id="_heading=h.gjdgxs">Methods</a></h1>"##,
            r##"<p><a id="keep">anchor</a><a href="#x" id="_Toc9">link</a></p>"##,
        ));
        let removed = remove_bookmarks(&mut parsed.dom, parsed.body);
        assert_eq!(removed, 2);

        let html = serialize_children(&parsed.dom, parsed.body);
        assert!(html.contains("<h1>Intro</h1>"), "{html}");
        assert!(html.contains("<h1>Methods</h1>"), "{html}");
        assert!(html.contains(r##"<a id="keep">anchor</a>"##));
        assert!(html.contains(r##"id="_Toc9""##));
    }
}
