//! Pass 12: Accessibility relations on footnotes
//!
//! Each pair ends up as:
//!
//! - reference: `role="doc-noteref"`, `href` to the definition and
//!   `aria-describedby` to the tooltip text (or to the definition when
//!   tooltips are off)
//! - tooltip text: `id="tooltip-KEY"` (suffixed like heading ids when that
//!   id is taken), `role="tooltip"`
//! - backlink: `role="doc-backlink"`, `href` to the reference, an
//!   `aria-label` naming the note
//!
//! Text content and structure are not touched.

use crate::config::Options;

use super::Document;
use super::headings::{document_ids, unique_id};
use super::predicates::tooltip_text_of;

pub fn annotate(doc: &mut Document, options: &Options) {
    let mut backlinks = 0;
    let mut used = document_ids(&doc.dom, doc.body);

    for pair in &doc.footnotes {
        let dom = &mut doc.dom;
        let Some(ref_id) = dom.element_id(pair.reference).map(str::to_string) else {
            continue;
        };
        let Some(def_id) = dom.element_id(pair.definition).map(str::to_string) else {
            continue;
        };

        dom.set_attr(pair.reference, "href", format!("#{def_id}"));
        dom.set_attr(pair.reference, "role", "doc-noteref");

        let described_by = match tooltip_text_of(dom, pair.reference).filter(|_| options.tooltips) {
            Some(tooltip) => {
                let tooltip_id = unique_id(&format!("tooltip-{}", pair.key), &used);
                used.insert(tooltip_id.clone());
                dom.set_attr(tooltip, "id", tooltip_id.as_str());
                dom.set_attr(tooltip, "role", "tooltip");
                tooltip_id
            }
            None => def_id,
        };
        dom.set_attr(pair.reference, "aria-describedby", described_by);

        match pair.backlink {
            Some(backlink) => {
                let number = dom.text(pair.reference);
                dom.set_attr(backlink, "href", format!("#{ref_id}"));
                dom.set_attr(backlink, "role", "doc-backlink");
                dom.set_attr(
                    backlink,
                    "aria-label",
                    format!("Back to reference {}", number.trim()),
                );
                backlinks += 1;
            }
            None => log::warn!("footnote '{}' has no backlink; back relation skipped", pair.key),
        }
    }

    log::debug!(
        "accessibility: {} references, {backlinks} backlinks annotated",
        doc.footnotes.len()
    );
}
