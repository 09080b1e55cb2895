//! Pass 6: Page markers
//!
//! Each page-break placeholder becomes `<sub class="pagenumber">{N}</sub>`
//! where the new page begins. The k-th break (0-based) carries `first + k`.

use crate::hooks;

use super::Document;

/// Replace placeholders with numbered markers; returns how many were placed.
pub fn insert_markers(doc: &mut Document, first_page: u32) -> usize {
    let mut markers = Vec::with_capacity(doc.page_breaks.len());

    for (k, &placeholder) in doc.page_breaks.iter().enumerate() {
        let number = first_page.saturating_add(k as u32);
        if doc.dom.parent(placeholder).is_none() {
            log::warn!("page break {number} no longer in the document; marker skipped");
            continue;
        }

        let marker = doc.dom.element("sub", &[("class", hooks::PAGE_NUMBER)]);
        doc.dom.append_text(marker, &format!("{{{number}}}"));
        doc.dom.replace(placeholder, marker);
        markers.push(marker);
    }

    log::debug!("page markers: {} placed from {first_page}", markers.len());
    doc.page_breaks = markers;
    doc.page_breaks.len()
}

/// Drop the engine's placeholders when page numbering is off.
pub fn remove_placeholders(doc: &mut Document) {
    for placeholder in std::mem::take(&mut doc.page_breaks) {
        doc.dom.detach(placeholder);
    }
}
