//! # sciweb
//!
//! Enriches the HTML that a DOCX converter produces for scientific web
//! publishing.
//!
//! ## Features
//!
//! - Footnote tooltips, optionally abbreviated, with DPUB-ARIA relations
//! - Unique heading ids and a nested, sticky navigation column
//! - Citable page markers `{N}` and paragraph numbers `[N]`
//! - Custom Word styles mapped to semantic tags and classes
//! - Soft wraps in long links, blockquote `cite`s, valid table captions
//!
//! ## Quick Start
//!
//! ```
//! use sciweb::{Options, convert_html};
//!
//! let input = r##"<h1>Intro</h1><p>Text<sup><a href="#footnote-1" id="footnote-ref-1">[1]</a></sup></p>
//! <ol><li id="footnote-1"><p>A note. <a href="#footnote-ref-1">↑</a></p></li></ol>"##;
//!
//! let html = convert_html(input, &Options::default()).unwrap();
//! assert!(html.contains(r#"<h1 id="intro">Intro</h1>"#));
//! assert!(html.contains(r#"<span class="tooltiptext" id="tooltip-footnote-1" role="tooltip">A note.</span>"#));
//! ```
//!
//! ## Pipeline
//!
//! A [`ConversionEngine`] turns the input into a [`Conversion`]: the tree plus
//! the footnote pairs, page breaks and style names recovered from it. The
//! passes in [`enrich`](enrich::enrich) then run in a fixed order over a
//! [`Document`], and [`assemble`](assemble::assemble) wraps the result in its
//! page shell.

pub mod assemble;
pub mod config;
pub mod dom;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod hooks;
pub mod style_map;
pub(crate) mod util;

use std::path::Path;

pub use config::{NavigationStyle, Options, SemanticStyles};
pub use engine::{Conversion, ConversionEngine, FootnotePair, HtmlEngine};
pub use enrich::{Document, EnrichSummary};
pub use error::{Error, Result};
pub use style_map::{StyleMap, StyleRule, StyleRuleError, parse_style_map};

/// Run one input through an engine, the enrichment passes and the assembler.
pub fn convert_with<E: ConversionEngine>(
    engine: &E,
    input: &[u8],
    options: &Options,
) -> Result<(String, EnrichSummary)> {
    let options = options.normalized();
    let mut doc = Document::from(engine.convert(input)?);
    let summary = enrich::enrich(&mut doc, &options);
    let html = assemble::assemble(&mut doc, &options);
    Ok((html, summary))
}

/// Enrich converter markup held in memory.
pub fn convert_html(input: &str, options: &Options) -> Result<String> {
    convert_with(&HtmlEngine, input.as_bytes(), options).map(|(html, _)| html)
}

/// Enrich a converter output file and write the result.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &Options,
) -> Result<EnrichSummary> {
    let bytes = std::fs::read(input.as_ref())?;
    let (html, summary) = convert_with(&HtmlEngine, &bytes, options)?;
    std::fs::write(output.as_ref(), html)?;
    log::info!(
        "wrote {} ({} tooltips, {} page markers)",
        output.as_ref().display(),
        summary.tooltips,
        summary.page_markers
    );
    Ok(summary)
}
