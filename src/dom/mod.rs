//! Document model: an arena DOM plus the readers and writer around it.
//!
//! Engine output is read as XHTML first and only handed to the html5ever
//! tree builder when it is not well-formed.

mod arena;
mod serialize;
mod tree_sink;
mod xml;

pub use arena::{ArenaDom, Attribute, ChildrenIter, Node, NodeData, NodeId, attr_qname, html_qname};
pub use serialize::{escape_attr, escape_text, serialize_children, serialize_node};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Which reader produced a parsed fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Well-formed XHTML, read with quick-xml.
    Xml,
    /// Lenient HTML5 tree building with html5ever.
    Html,
}

/// A parsed engine fragment: the tree and the element holding its content.
pub struct ParsedFragment {
    pub dom: ArenaDom,
    /// The `<body>` element (synthesized when the input is a bare fragment).
    pub body: NodeId,
    pub mode: ParseMode,
}

/// Parse engine markup, accepting either a bare fragment or a full document.
pub fn parse_fragment(content: &str) -> ParsedFragment {
    match parse_xml(content) {
        Ok(parsed) => parsed,
        Err(reason) => {
            log::warn!(
                "engine output is not well-formed XHTML ({reason}); parsing as HTML, \
                 captions outside tables may be dropped"
            );
            parse_html(content)
        }
    }
}

fn parse_xml(content: &str) -> Result<ParsedFragment, String> {
    let mut dom = ArenaDom::new();
    let doc = dom.document();
    let wrapper = dom.element("body", &[]);
    dom.append(doc, wrapper);
    xml::read_into(&mut dom, wrapper, content)?;

    // A full document nests its own body inside the synthesized wrapper.
    let body = match dom.find_all_by_tag(wrapper, "body").first() {
        Some(&inner) => {
            dom.replace(wrapper, inner);
            inner
        }
        None => wrapper,
    };

    Ok(ParsedFragment {
        dom,
        body,
        mode: ParseMode::Xml,
    })
}

fn parse_html(content: &str) -> ParsedFragment {
    let lower = content.to_ascii_lowercase();
    let wrapped = if lower.contains("<body") || lower.contains("<html") {
        content.to_string()
    } else {
        format!("<!DOCTYPE html><html><head></head><body>{content}</body></html>")
    };

    let mut dom = parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());

    // The tree builder always synthesizes a body.
    let body = match dom.find_by_tag("body") {
        Some(body) => body,
        None => {
            let body = dom.element("body", &[]);
            let doc = dom.document();
            dom.append(doc, body);
            body
        }
    };

    ParsedFragment {
        dom,
        body,
        mode: ParseMode::Html,
    }
}
