//! Post-conversion enrichment passes.
//!
//! Every pass mutates the shared [`Document`] in place and reads the one
//! [`Options`] value it is given. The passes are order-dependent, so they
//! only run through [`enrich`].
//!
//! ## Pipeline Order
//!
//! 1. **Style map** - Apply style rules to marked paragraphs and runs
//! 2. **Bookmarks** - Unwrap Word `_Toc`/`_heading` anchors
//! 3. **Heading ids** - Unique slug ids on h1–h3
//! 4. **Navigation** - Nested link list built from the heading ids
//! 5. **Footnotes** - Tooltips, reference cleanup, bottom-list separator
//! 6. **Page markers** - `{N}` at each page start
//! 7. **Paragraph numbers** - `[N]` on eligible paragraphs
//! 8. **Soft wraps** - `<wbr>` after slashes in links and footnotes
//! 9. **Blockquote cites** - Footnote text into `cite`
//! 10. **Table captions** - Move captions into their tables
//! 11. **Media comments** - Placeholder comments before media captions
//! 12. **Accessibility** - Roles and relations on footnote constructs

mod aria;
mod captions;
mod cite;
mod cleanup;
mod footnotes;
mod headings;
mod media;
mod navigation;
mod pages;
mod paragraphs;
mod predicates;
mod wrap_links;

pub use headings::slugify;
pub use navigation::{NavItem, collect_items};
pub use wrap_links::insert_soft_wraps;

use crate::config::Options;
use crate::dom::{ArenaDom, NodeId};
use crate::engine::{Conversion, FootnotePair};
use crate::style_map::{self, StyleMap};

/// A converted document moving through the pipeline.
pub struct Document {
    pub dom: ArenaDom,
    /// Element whose children are the document content.
    pub body: NodeId,
    /// Footnote pairs from the engine, in reference order.
    pub footnotes: Vec<FootnotePair>,
    /// Page-break placeholders from the engine, in document order.
    pub page_breaks: Vec<NodeId>,
    pub detected_styles: Vec<String>,
    /// Detached navigation column, attached by the assembler.
    pub navigation: Option<NodeId>,
}

impl From<Conversion> for Document {
    fn from(conversion: Conversion) -> Self {
        Self {
            dom: conversion.dom,
            body: conversion.body,
            footnotes: conversion.footnotes,
            page_breaks: conversion.page_breaks,
            detected_styles: conversion.detected_styles,
            navigation: None,
        }
    }
}

/// What each pass did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub styled: usize,
    pub skipped_rules: usize,
    pub bookmarks_removed: usize,
    pub heading_ids: usize,
    pub nav_items: usize,
    pub tooltips: usize,
    pub page_markers: usize,
    pub numbered_paragraphs: usize,
    pub soft_wraps: usize,
    pub cites: usize,
    pub captions_moved: usize,
    pub media_comments: usize,
}

/// Run every pass in order.
pub fn enrich(doc: &mut Document, options: &Options) -> EnrichSummary {
    let mut summary = EnrichSummary::default();

    let map = StyleMap::from_options(options);
    summary.skipped_rules = map.skipped.len();
    summary.styled = style_map::apply(&mut doc.dom, doc.body, &map);

    summary.bookmarks_removed = cleanup::remove_bookmarks(&mut doc.dom, doc.body);

    // Navigation links need targets even when ids were not requested.
    if options.heading_ids || options.navigation {
        summary.heading_ids = headings::assign_ids(&mut doc.dom, doc.body, &doc.footnotes);
    }

    if options.navigation {
        let items = navigation::collect_items(&doc.dom, doc.body, &doc.footnotes);
        summary.nav_items = navigation::count(&items);
        doc.navigation = navigation::render(&mut doc.dom, &items, options.navigation_style);
    }

    summary.tooltips = footnotes::process(doc, options);

    if options.page_numbers {
        summary.page_markers = pages::insert_markers(doc, options.first_page_number());
    } else {
        pages::remove_placeholders(doc);
    }

    if options.paragraph_numbers {
        summary.numbered_paragraphs =
            paragraphs::number(&mut doc.dom, doc.body, options.exclusion_class());
    }

    summary.soft_wraps = wrap_links::wrap(doc);
    summary.cites = cite::inject(doc);
    summary.captions_moved = captions::relocate(&mut doc.dom, doc.body);
    summary.media_comments = media::insert_comments(&mut doc.dom, doc.body);
    aria::annotate(doc, options);

    log::debug!("enrichment finished: {summary:?}");
    summary
}
