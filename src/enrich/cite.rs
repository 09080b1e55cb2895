//! Pass 9: Blockquote cites

use crate::engine::FootnotePair;

use super::Document;
use super::predicates::definition_text;

/// Set `cite` on each blockquote that carries a footnote reference.
///
/// The reference is taken from inside the blockquote or, failing that, from
/// the element right after it. Blockquotes without one are left as they are.
pub fn inject(doc: &mut Document) -> usize {
    let blockquotes = doc.dom.find_all_by_tag(doc.body, "blockquote");
    let mut injected = 0;

    for blockquote in blockquotes {
        let following = doc.dom.next_element_sibling(blockquote);
        let pair = associated_pair(doc, blockquote).or_else(|| {
            following.and_then(|next| {
                doc.footnotes.iter().find(|pair| {
                    pair.reference == next || doc.dom.is_ancestor(next, pair.reference)
                })
            })
        });
        let Some(pair) = pair else {
            continue;
        };

        let text = definition_text(&doc.dom, pair);
        if text.is_empty() {
            log::warn!("footnote '{}' has no text; blockquote cite skipped", pair.key);
            continue;
        }
        doc.dom.set_attr(blockquote, "cite", text);
        injected += 1;
    }

    log::debug!("blockquote cites: {injected} set");
    injected
}

fn associated_pair(doc: &Document, blockquote: crate::dom::NodeId) -> Option<&FootnotePair> {
    doc.footnotes
        .iter()
        .find(|pair| doc.dom.is_ancestor(blockquote, pair.reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Conversion;

    const NOTES: &str = concat!(
        r##"<ol><li id="footnote-1"><p>Smith, On Quotes, 1999. <a href="#footnote-ref-1">↑</a></p></li>"##,
        r##"<li id="footnote-2"><p>Other. <a href="#footnote-ref-2">↑</a></p></li></ol>"##,
    );

    fn document(body: &str) -> Document {
        Conversion::from_markup(&format!("{body}{NOTES}")).unwrap().into()
    }

    #[test]
    fn test_reference_inside_blockquote() {
        let mut doc = document(concat!(
            r##"<blockquote>Quoted text.<sup><a href="#footnote-1" id="footnote-ref-1">[1]</a></sup></blockquote>"##,
            r##"<p>x<sup><a href="#footnote-2" id="footnote-ref-2">[2]</a></sup></p>"##,
        ));
        assert_eq!(inject(&mut doc), 1);
        let bq = doc.dom.find_all_by_tag(doc.body, "blockquote")[0];
        assert_eq!(doc.dom.get_attr(bq, "cite"), Some("Smith, On Quotes, 1999."));
    }

    #[test]
    fn test_reference_right_after_blockquote() {
        let mut doc = document(concat!(
            "<blockquote>Quoted text.</blockquote>",
            r##"<p><sup><a href="#footnote-1" id="footnote-ref-1">[1]</a></sup></p>"##,
            r##"<p>x<sup><a href="#footnote-2" id="footnote-ref-2">[2]</a></sup></p>"##,
        ));
        assert_eq!(inject(&mut doc), 1);
    }

    #[test]
    fn test_no_reference_no_cite() {
        let mut doc = document(concat!(
            "<blockquote>Quoted text.</blockquote>",
            "<p>Plain.</p>",
            r##"<p>x<sup><a href="#footnote-1" id="footnote-ref-1">[1]</a></sup></p>"##,
        ));
        assert_eq!(inject(&mut doc), 0);
        let bq = doc.dom.find_all_by_tag(doc.body, "blockquote")[0];
        assert_eq!(doc.dom.get_attr(bq, "cite"), None);
    }
}
