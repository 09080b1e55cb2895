//! HTML serializer for ArenaDom.
//!
//! Walks the tree and emits HTML5 markup. Block-level elements go on their
//! own lines with two-space indentation; inline content is written exactly as
//! it sits in the tree so that no whitespace is introduced into running text.

use std::fmt::Write;

use super::arena::{ArenaDom, NodeData, NodeId};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that start on their own line.
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "head", "body", "title", "meta", "style", "script", "link", "div", "nav", "p",
    "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "ol", "ul", "li", "table", "thead",
    "tbody", "tfoot", "tr", "td", "th", "caption", "hr", "button", "figure", "figcaption",
    "section", "aside", "dl", "dt", "dd", "pre",
];

/// Serialize a node and its subtree.
pub fn serialize_node(dom: &ArenaDom, id: NodeId) -> String {
    let mut ctx = SerializeContext {
        out: String::new(),
        dom,
        indent_level: 0,
    };
    walk_node(id, &mut ctx);
    finish(ctx.out)
}

/// Serialize the children of a node, without the node itself.
pub fn serialize_children(dom: &ArenaDom, id: NodeId) -> String {
    let mut ctx = SerializeContext {
        out: String::new(),
        dom,
        indent_level: 0,
    };
    for child in dom.children(id) {
        walk_node(child, &mut ctx);
    }
    finish(ctx.out)
}

fn finish(mut out: String) -> String {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

struct SerializeContext<'a> {
    out: String,
    dom: &'a ArenaDom,
    indent_level: usize,
}

impl SerializeContext<'_> {
    fn indent(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        for _ in 0..self.indent_level {
            self.out.push_str("  ");
        }
    }
}

fn walk_node(id: NodeId, ctx: &mut SerializeContext) {
    let Some(node) = ctx.dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in ctx.dom.children(id) {
                walk_node(child, ctx);
            }
        }
        NodeData::Doctype { name, .. } => {
            write!(ctx.out, "<!DOCTYPE {name}>").ok();
            ctx.out.push('\n');
        }
        NodeData::Text(text) => {
            let parent = ctx.dom.parent(id);
            let raw = ctx
                .dom
                .element_name(parent)
                .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n.as_ref()));
            if raw {
                ctx.out.push_str(text);
            } else if text.trim().is_empty()
                && is_block_parent(ctx.dom, parent)
                && is_layout_boundary(ctx.dom, ctx.dom.prev_sibling(id))
                && is_layout_boundary(ctx.dom, ctx.dom.next_sibling(id))
            {
                // Indentation noise between block children is regenerated.
            } else {
                ctx.out.push_str(&escape_text(text));
            }
        }
        NodeData::Comment(text) => {
            ctx.indent();
            write!(ctx.out, "<!--{text}-->").ok();
        }
        NodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            let is_block = BLOCK_ELEMENTS.contains(&tag);
            let is_void = VOID_ELEMENTS.contains(&tag);

            if is_block {
                ctx.indent();
            }

            write!(ctx.out, "<{tag}").ok();
            for attr in attrs {
                write!(
                    ctx.out,
                    " {}=\"{}\"",
                    attr.name.local.as_ref(),
                    escape_attr(&attr.value)
                )
                .ok();
            }
            ctx.out.push('>');

            if is_void {
                return;
            }

            let has_block_child = ctx.dom.children(id).any(|c| {
                ctx.dom
                    .element_name(c)
                    .is_some_and(|n| BLOCK_ELEMENTS.contains(&n.as_ref()))
                    || matches!(ctx.dom.get(c).map(|n| &n.data), Some(NodeData::Comment(_)))
            });

            ctx.indent_level += 1;
            for child in ctx.dom.children(id) {
                walk_node(child, ctx);
            }
            ctx.indent_level -= 1;

            if is_block && has_block_child {
                ctx.indent();
            }
            write!(ctx.out, "</{tag}>").ok();
        }
    }
}

/// Blank text directly inside these is formatting, not content.
fn is_block_parent(dom: &ArenaDom, parent: NodeId) -> bool {
    dom.element_name(parent).is_some_and(|n| {
        matches!(
            n.as_ref(),
            "html" | "head" | "body" | "div" | "nav" | "ol" | "ul" | "table" | "thead" | "tbody"
                | "tfoot" | "tr"
        )
    }) || matches!(dom.get(parent).map(|n| &n.data), Some(NodeData::Document))
}

/// Missing siblings, block elements and comments start their own line, so
/// blank text next to them carries no meaning.
fn is_layout_boundary(dom: &ArenaDom, sibling: NodeId) -> bool {
    match dom.get(sibling).map(|n| &n.data) {
        None => true,
        Some(NodeData::Comment(_)) => true,
        Some(NodeData::Element { name, .. }) => BLOCK_ELEMENTS.contains(&name.local.as_ref()),
        Some(_) => false,
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_with_inline_markup() {
        let mut dom = ArenaDom::new();
        let p = dom.element("p", &[("class", "intro")]);
        dom.append_text(p, "Hello, ");
        let em = dom.element("em", &[]);
        dom.append_text(em, "World");
        dom.append(p, em);
        dom.append_text(p, "!");

        assert_eq!(
            serialize_node(&dom, p),
            "<p class=\"intro\">Hello, <em>World</em>!</p>\n"
        );
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let mut dom = ArenaDom::new();
        let a = dom.element("a", &[("href", "http://a/b")]);
        dom.append_text(a, "http:/");
        let wbr = dom.element("wbr", &[]);
        dom.append(a, wbr);
        dom.append_text(a, "/a");

        let html = serialize_node(&dom, a);
        assert_eq!(html, "<a href=\"http://a/b\">http:/<wbr>/a</a>\n");
    }

    #[test]
    fn test_block_children_are_indented() {
        let mut dom = ArenaDom::new();
        let div = dom.element("div", &[]);
        let p = dom.element("p", &[]);
        dom.append_text(p, "x");
        dom.append(div, p);

        assert_eq!(serialize_node(&dom, div), "<div>\n  <p>x</p>\n</div>\n");
    }

    #[test]
    fn test_space_between_inline_siblings_is_kept() {
        let mut dom = ArenaDom::new();
        let div = dom.element("div", &[]);
        for word in ["alpha", "beta"] {
            if dom.first_child(div).is_some() {
                dom.append_text(div, " ");
            }
            let em = dom.element("em", &[]);
            dom.append_text(em, word);
            dom.append(div, em);
        }

        assert_eq!(
            serialize_node(&dom, div),
            "<div><em>alpha</em> <em>beta</em></div>\n"
        );
    }

    #[test]
    fn test_blank_text_between_blocks_is_dropped() {
        let mut dom = ArenaDom::new();
        let div = dom.element("div", &[]);
        for text in ["a", "b"] {
            dom.append_text(div, "\n  ");
            let p = dom.element("p", &[]);
            dom.append_text(p, text);
            dom.append(div, p);
        }
        dom.append_text(div, "\n");

        assert_eq!(
            serialize_node(&dom, div),
            "<div>\n  <p>a</p>\n  <p>b</p>\n</div>\n"
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_style_content_is_raw() {
        let mut dom = ArenaDom::new();
        let style = dom.element("style", &[]);
        dom.append_text(style, ".a > .b { color: red; }");
        assert_eq!(
            serialize_node(&dom, style),
            "<style>.a > .b { color: red; }</style>\n"
        );
    }

    #[test]
    fn test_comment() {
        let mut dom = ArenaDom::new();
        let div = dom.element("div", &[]);
        let c = dom.create_comment(" Navigation ");
        dom.append(div, c);
        assert_eq!(serialize_node(&dom, div), "<div>\n  <!-- Navigation -->\n</div>\n");
    }
}
