//! Pass 11: Media placeholders
//!
//! The engine drops embedded media it cannot convert. A comment before each
//! media caption marks where the editor has to put it back.

use crate::dom::{ArenaDom, NodeData, NodeId};
use crate::hooks;

const MEDIA_COMMENT: &str = " Insert Media ";

pub fn insert_comments(dom: &mut ArenaDom, root: NodeId) -> usize {
    let captions = dom.find_all(root, |dom, id| {
        dom.is_tag(id, "p") && dom.has_class(id, hooks::MEDIA_CAPTION)
    });

    let mut inserted = 0;
    for caption in captions {
        if has_comment_before(dom, caption) {
            continue;
        }
        let comment = dom.create_comment(MEDIA_COMMENT);
        dom.insert_before(caption, comment);
        inserted += 1;
    }

    log::debug!("media comments: {inserted} inserted");
    inserted
}

fn has_comment_before(dom: &ArenaDom, node: NodeId) -> bool {
    let mut current = dom.prev_sibling(node);
    while let Some(prev) = dom.get(current) {
        match &prev.data {
            NodeData::Comment(text) => return text == MEDIA_COMMENT,
            NodeData::Text(text) if text.trim().is_empty() => current = dom.prev_sibling(current),
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    #[test]
    fn test_comment_before_each_caption() {
        let mut parsed = parse_fragment(concat!(
            "<p>Text</p>",
            r#"<p class="mediacaption">Figure 1: Setup</p>"#,
            r#"<p class="mediacaption">Video 1: Demo</p>"#,
        ));
        assert_eq!(insert_comments(&mut parsed.dom, parsed.body), 2);
        assert_eq!(insert_comments(&mut parsed.dom, parsed.body), 0);

        let html = serialize_children(&parsed.dom, parsed.body);
        assert_eq!(html.matches("<!-- Insert Media -->").count(), 2);
        let comment = html.find("<!-- Insert Media -->").unwrap();
        assert!(comment > html.find("<p>Text</p>").unwrap());
    }
}
