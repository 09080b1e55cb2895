//! Pass 5: Footnote tooltips
//!
//! The engine emits a reference as `<sup><a id="footnote-ref-N">[N]</a></sup>`.
//! With tooltips enabled it becomes
//!
//! ```html
//! <span class="tooltip">
//!   <a href="#footnote-N" id="footnote-ref-N"><sup>N</sup></a>
//!   <span class="tooltiptext">Definition text</span>
//! </span>
//! ```
//!
//! so that only the number is superscripted. Without tooltips only the
//! brackets are dropped. Either way the trailing definition list is set off
//! from the content with a rule.

use crate::config::Options;
use crate::dom::{ArenaDom, NodeId};
use crate::engine::FootnotePair;
use crate::hooks;
use crate::util::take_chars;

use super::Document;
use super::predicates::{definition_text, is_blank_text, strip_brackets};

/// Appended to abbreviated tooltip text.
pub const TRUNCATION_MARK: &str = "[...]";

/// Rewrite every matched reference; returns the number of tooltips built.
pub fn process(doc: &mut Document, options: &Options) -> usize {
    let limit = if options.tooltips {
        options.tooltip_limit()
    } else {
        None
    };

    let mut tooltips = 0;
    for pair in &doc.footnotes {
        let number = strip_brackets(&doc.dom.text(pair.reference)).to_string();

        if options.tooltips {
            build_tooltip(&mut doc.dom, pair, &number, limit);
            tooltips += 1;
        } else {
            doc.dom.replace_children_with_text(pair.reference, &number);
        }
    }

    separate_bottom_list(&mut doc.dom, &doc.footnotes);

    log::debug!(
        "footnotes: {} references, {tooltips} tooltips (abbreviation: {limit:?})",
        doc.footnotes.len()
    );
    tooltips
}

fn build_tooltip(dom: &mut ArenaDom, pair: &FootnotePair, number: &str, limit: Option<usize>) {
    let reference = pair.reference;
    let tooltip = dom.element("span", &[("class", hooks::TOOLTIP)]);

    // The engine's <sup> is replaced when it holds nothing but the reference.
    let parent = dom.parent(reference);
    let only_child = dom
        .child_vec(parent)
        .into_iter()
        .all(|child| child == reference || is_blank_text(dom, child));
    if dom.is_tag(parent, "sup") && only_child {
        dom.replace(parent, tooltip);
    } else {
        dom.insert_before(reference, tooltip);
    }
    dom.append(tooltip, reference);

    dom.replace_children_with_text(reference, "");
    let sup = dom.element("sup", &[]);
    dom.append_text(sup, number);
    dom.append(reference, sup);

    let text = dom.element("span", &[("class", hooks::TOOLTIP_TEXT)]);
    match limit {
        Some(limit) => {
            let abbreviated = abbreviate(&definition_text(dom, pair), limit);
            dom.append_text(text, &abbreviated);
        }
        None => copy_rich_content(dom, pair, text),
    }
    dom.append(tooltip, text);
}

/// Plain text cut to `limit` characters, marked when anything was dropped.
pub fn abbreviate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    format!("{}{TRUNCATION_MARK}", take_chars(text, limit))
}

/// Copy the definition's inline content, without its backlink, into `target`.
///
/// Block wrappers (`<p>`) are flattened and spans unwrapped, since the
/// tooltip is itself inline. The copy carries no `id`s; those stay with the
/// definition.
fn copy_rich_content(dom: &mut ArenaDom, pair: &FootnotePair, target: NodeId) {
    let mut first_block = true;
    for child in dom.child_vec(pair.definition) {
        let flatten = dom.is_tag(child, "p") || dom.is_tag(child, "div");
        if flatten {
            if !first_block {
                let br = dom.element("br", &[]);
                dom.append(target, br);
            }
            first_block = false;
            for inline in dom.child_vec(child) {
                copy_inline(dom, pair, inline, target);
            }
        } else {
            copy_inline(dom, pair, child, target);
        }
    }

    for span in dom.find_all_by_tag(target, "span") {
        dom.unwrap(span);
    }
    trim_edges(dom, target);
}

fn copy_inline(dom: &mut ArenaDom, pair: &FootnotePair, node: NodeId, target: NodeId) {
    if Some(node) == pair.backlink {
        return;
    }
    let copy = dom.clone_subtree(node);
    if let Some(backlink) = pair.backlink
        && dom.is_ancestor(node, backlink)
    {
        let href = dom.get_attr(backlink, "href").map(str::to_string);
        for link in dom.find_all_by_tag(copy, "a") {
            if dom.get_attr(link, "href").map(str::to_string) == href {
                dom.detach(link);
            }
        }
    }
    dom.remove_attr(copy, "id");
    for element in dom.find_all(copy, |dom, id| dom.is_element(id)) {
        dom.remove_attr(element, "id");
    }
    dom.append(target, copy);
}

/// Strip leading and trailing whitespace of the copied content.
fn trim_edges(dom: &mut ArenaDom, target: NodeId) {
    let texts = dom.find_all(target, |dom, id| dom.is_text(id));
    if let Some(&first) = texts.first()
        && let Some(content) = dom.text_content(first)
    {
        let trimmed = content.trim_start().to_string();
        dom.set_text(first, trimmed);
    }
    if let Some(&last) = texts.last()
        && let Some(content) = dom.text_content(last)
    {
        let trimmed = content.trim_end().to_string();
        dom.set_text(last, trimmed);
    }
}

/// Put a comment and a rule before the list holding the definitions.
fn separate_bottom_list(dom: &mut ArenaDom, footnotes: &[FootnotePair]) {
    let Some(pair) = footnotes.first() else {
        return;
    };
    let list = dom.parent(pair.definition);
    if list.is_none() || dom.parent(list).is_none() {
        return;
    }

    let comment = dom.create_comment(" Bottom footnotes ");
    dom.insert_before(list, comment);
    for tag in ["br", "hr", "br"] {
        let node = dom.element(tag, &[]);
        dom.insert_before(list, node);
    }
}
