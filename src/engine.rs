//! Boundary with the DOCX conversion engine.
//!
//! The engine turns the binary document into markup. Everything this crate
//! needs beyond the tree itself (footnote pairs, page-break positions and the
//! custom style names in use) is recovered here from the engine's markup
//! conventions, once, so that no pass has to infer associations later:
//!
//! - footnote reference: `<a id="footnote-ref-1" href="#footnote-1">[1]</a>`
//! - footnote definition: `<li id="footnote-1">…<a href="#footnote-ref-1">↑</a></li>`
//!   (`endnote-` ids are handled the same way)
//! - page break: any element with the `page-break` class
//! - custom style: a `data-style-name` attribute on the styled element

use std::collections::{BTreeSet, HashMap};

use crate::dom::{self, ArenaDom, NodeId, ParseMode};
use crate::error::{Error, Result};
use crate::util;

/// Class the engine puts on page-break placeholders.
pub const PAGE_BREAK_CLASS: &str = "page-break";

/// Attribute carrying the source style name of a paragraph or run.
pub const STYLE_NAME_ATTR: &str = "data-style-name";

const NOTE_PREFIXES: &[&str] = &["footnote", "endnote"];

/// Something that can turn an input document into a [`Conversion`].
pub trait ConversionEngine {
    fn convert(&self, input: &[u8]) -> Result<Conversion>;
}

/// Reads markup already produced by an external DOCX-to-HTML converter.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlEngine;

impl ConversionEngine for HtmlEngine {
    fn convert(&self, input: &[u8]) -> Result<Conversion> {
        let hint = util::extract_declared_encoding(input);
        let text = util::decode_text(input, hint);
        Conversion::from_markup(&text)
    }
}

/// A matched footnote reference and definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnotePair {
    /// Stable key shared by both halves, e.g. `footnote-3`.
    pub key: String,
    /// The reference anchor in the running text.
    pub reference: NodeId,
    /// The `<li>` holding the definition.
    pub definition: NodeId,
    /// The anchor in the definition pointing back at the reference.
    pub backlink: Option<NodeId>,
}

/// The engine's raw tree plus the auxiliary data recovered from it.
pub struct Conversion {
    pub dom: ArenaDom,
    /// Element whose children are the document content.
    pub body: NodeId,
    pub mode: ParseMode,
    /// Page-break placeholders, in document order.
    pub page_breaks: Vec<NodeId>,
    /// Footnote pairs, in reference order.
    pub footnotes: Vec<FootnotePair>,
    /// Distinct custom style names found in the document.
    pub detected_styles: Vec<String>,
}

impl Conversion {
    /// Parse engine markup and index its footnotes, page breaks and styles.
    pub fn from_markup(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::SourceConversion(
                "the conversion engine produced no markup".to_string(),
            ));
        }

        let parsed = dom::parse_fragment(content);
        let dom = parsed.dom;
        let body = parsed.body;

        if dom.children(body).next().is_none() {
            return Err(Error::SourceConversion(
                "the converted document has no content".to_string(),
            ));
        }

        let page_breaks = dom.find_all(body, |dom, id| dom.has_class(id, PAGE_BREAK_CLASS));
        let footnotes = match_footnotes(&dom, body);

        let detected_styles: BTreeSet<String> = dom
            .descendants(body)
            .into_iter()
            .filter_map(|id| dom.get_attr(id, STYLE_NAME_ATTR))
            .map(|s| s.to_string())
            .collect();

        log::debug!(
            "conversion: {} footnotes, {} page breaks, {} custom styles ({:?} reader)",
            footnotes.len(),
            page_breaks.len(),
            detected_styles.len(),
            parsed.mode
        );

        Ok(Self {
            dom,
            body,
            mode: parsed.mode,
            page_breaks,
            footnotes,
            detected_styles: detected_styles.into_iter().collect(),
        })
    }

    /// Look up a footnote pair by key.
    pub fn footnote(&self, key: &str) -> Option<&FootnotePair> {
        self.footnotes.iter().find(|pair| pair.key == key)
    }
}

/// Split a reference id like `footnote-ref-3` into its key `footnote-3`.
pub fn reference_key(id: &str) -> Option<String> {
    NOTE_PREFIXES.iter().find_map(|prefix| {
        id.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix("-ref-"))
            .filter(|n| !n.is_empty())
            .map(|n| format!("{prefix}-{n}"))
    })
}

/// The key of a definition id like `footnote-3`.
fn definition_key(id: &str) -> Option<String> {
    if reference_key(id).is_some() {
        return None;
    }
    NOTE_PREFIXES.iter().find_map(|prefix| {
        id.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|n| !n.is_empty())
            .map(|_| id.to_string())
    })
}

fn match_footnotes(dom: &ArenaDom, body: NodeId) -> Vec<FootnotePair> {
    let mut definitions: HashMap<String, NodeId> = HashMap::new();
    for li in dom.find_all_by_tag(body, "li") {
        if let Some(key) = dom.element_id(li).and_then(definition_key)
            && definitions.insert(key.clone(), li).is_some()
        {
            log::warn!("footnote definition '{key}' appears more than once; using the last one");
        }
    }

    let mut pairs: Vec<FootnotePair> = Vec::new();
    for a in dom.find_all_by_tag(body, "a") {
        let Some(ref_id) = dom.element_id(a) else {
            continue;
        };
        let Some(key) = reference_key(ref_id) else {
            continue;
        };
        if pairs.iter().any(|p| p.key == key) {
            log::warn!("footnote reference '{key}' appears more than once; keeping the first");
            continue;
        }
        let Some(&definition) = definitions.get(&key) else {
            log::warn!("footnote reference '{key}' has no definition; skipping it");
            continue;
        };

        let target = format!("#{ref_id}");
        let backlink = dom
            .find_all_by_tag(definition, "a")
            .into_iter()
            .find(|&link| dom.get_attr(link, "href") == Some(target.as_str()));

        pairs.push(FootnotePair {
            key,
            reference: a,
            definition,
            backlink,
        });
    }

    for key in definitions.keys() {
        if !pairs.iter().any(|p| &p.key == key) {
            log::warn!("footnote definition '{key}' is never referenced");
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        r##"<p data-style-name="FVMW Blockquote">Quote<sup><a href="#footnote-1" id="footnote-ref-1">[1]</a></sup></p>"##,
        r##"<p>Text<sup><a href="#footnote-2" id="footnote-ref-2">[2]</a></sup><span class="page-break"/>next page</p>"##,
        r##"<p>Orphan<sup><a href="#footnote-9" id="footnote-ref-9">[9]</a></sup></p>"##,
        r##"<ol><li id="footnote-1"><p> First note. <a href="#footnote-ref-1">↑</a></p></li>"##,
        r##"<li id="footnote-2"><p> Second note. <a href="#footnote-ref-2">↑</a></p></li></ol>"##,
    );

    #[test]
    fn test_reference_key() {
        assert_eq!(reference_key("footnote-ref-12").as_deref(), Some("footnote-12"));
        assert_eq!(reference_key("endnote-ref-2").as_deref(), Some("endnote-2"));
        assert_eq!(reference_key("footnote-12"), None);
        assert_eq!(reference_key("footnote-ref-"), None);
        assert_eq!(reference_key("_Toc123"), None);
    }

    #[test]
    fn test_definition_key() {
        assert_eq!(definition_key("footnote-3").as_deref(), Some("footnote-3"));
        assert_eq!(definition_key("footnote-ref-3"), None);
        assert_eq!(definition_key("heading"), None);
    }

    #[test]
    fn test_matches_pairs_by_key() {
        let conversion = Conversion::from_markup(SAMPLE).unwrap();
        assert_eq!(conversion.footnotes.len(), 2);

        let first = conversion.footnote("footnote-1").unwrap();
        assert_eq!(conversion.dom.element_id(first.reference), Some("footnote-ref-1"));
        assert_eq!(conversion.dom.element_id(first.definition), Some("footnote-1"));
        let backlink = first.backlink.expect("backlink");
        assert_eq!(conversion.dom.get_attr(backlink, "href"), Some("#footnote-ref-1"));

        assert!(conversion.footnote("footnote-9").is_none());
    }

    #[test]
    fn test_collects_page_breaks_and_styles() {
        let conversion = Conversion::from_markup(SAMPLE).unwrap();
        assert_eq!(conversion.page_breaks.len(), 1);
        assert_eq!(conversion.detected_styles, vec!["FVMW Blockquote".to_string()]);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(
            Conversion::from_markup("   "),
            Err(Error::SourceConversion(_))
        ));
        assert!(matches!(
            Conversion::from_markup("<!-- nothing -->").map(|c| c.footnotes.len()),
            Ok(0)
        ));
    }

    #[test]
    fn test_html_engine_decodes_bytes() {
        let conversion = HtmlEngine.convert(b"<p>caf\xe9</p>").unwrap();
        let p = conversion.dom.element_children(conversion.body)[0];
        assert_eq!(conversion.dom.text(p), "café");
    }
}
