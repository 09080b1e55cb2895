//! Options files, style-map rules and file conversion.

use std::fs;

use sciweb::{Error, Options, convert_file, convert_html, parse_style_map};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

// ============================================================================
// Options files
// ============================================================================

#[test]
fn test_load_options_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    fs::write(
        &path,
        r#"{
            "body_only": false,
            "page_title": "Paper",
            "paragraph_numbers": true,
            "abbreviate_tooltips": 40,
            "styles": { "heading": "Title Heading" }
        }"#,
    )
    .unwrap();

    let options = Options::load(&path).unwrap();
    assert!(!options.body_only);
    assert_eq!(options.page_title.as_deref(), Some("Paper"));
    assert_eq!(options.tooltip_limit(), Some(40));
    assert_eq!(options.styles.heading.as_deref(), Some("Title Heading"));
    // Unlisted styles keep their defaults.
    assert_eq!(options.styles.media_caption.as_deref(), Some("FVMW Media"));
    assert!(options.page_numbers);
}

#[test]
fn test_missing_options_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Options::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_disabled_semantic_style_is_left_alone() {
    let options = Options::from_json_str(r#"{"styles": {"blockquote": null}}"#).unwrap();
    let html = convert_html(
        r#"<p data-style-name="FVMW Blockquote">Quote</p>"#,
        &options,
    )
    .unwrap();
    assert!(!html.contains("<blockquote"), "{html}");
    assert!(html.contains(">Quote</p>"), "{html}");
}

// ============================================================================
// Style map
// ============================================================================

#[test]
fn test_user_rules_map_paragraphs_and_runs() {
    let options = Options {
        style_map: [
            "p[style-name='Abstract'] => div.abstract:fresh",
            "r[style-name='Latin'] => em.latin",
            "Motto => p.motto",
        ]
        .join("\n"),
        ..Options::default()
    };
    let html = convert_html(
        concat!(
            r#"<p data-style-name="Abstract">Summary</p>"#,
            r#"<p>An <span data-style-name="Latin">et al.</span> run</p>"#,
            r#"<p data-style-name="Motto">Carpe diem</p>"#,
        ),
        &options,
    )
    .unwrap();

    assert!(html.contains(r#"<div class="abstract">Summary</div>"#), "{html}");
    assert!(html.contains(r#"<em class="latin">et al.</em>"#), "{html}");
    assert!(html.contains(r#"<p class="motto">Carpe diem</p>"#), "{html}");
    assert!(!html.contains("data-style-name"), "{html}");
}

#[test]
fn test_invalid_rules_are_collected_not_fatal() {
    let map = parse_style_map("p[style-name='A'] => p.a\nnot a rule\np[style-name=B] => p.b");
    assert_eq!(map.rules.len(), 1);
    assert_eq!(map.skipped.len(), 2);
    assert_eq!(map.skipped[0].line, 2);

    let options = Options {
        style_map: "not a rule".to_string(),
        ..Options::default()
    };
    assert!(convert_html("<p>x</p>", &options).is_ok());
}

// ============================================================================
// File conversion
// ============================================================================

#[test]
fn test_convert_file_writes_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("paper.web.html");

    let summary = convert_file(
        format!("{FIXTURES_DIR}/paper.html"),
        &output,
        &Options::default(),
    )
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<body>"));
    assert!(html.contains("tooltiptext"));
    assert_eq!(summary.tooltips, 2);
    assert_eq!(summary.numbered_paragraphs, 0);
}

#[test]
fn test_convert_file_decodes_declared_encoding() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("latin1.html");
    let output = dir.path().join("out.html");

    let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><p>Stra"#.to_vec();
    bytes.push(0xDF);
    bytes.extend_from_slice(b"e</p>");
    fs::write(&input, bytes).unwrap();

    convert_file(&input, &output, &Options::default()).unwrap();
    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<p>Straße</p>"), "{html}");
}

#[test]
fn test_convert_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = convert_file(
        dir.path().join("absent.html"),
        dir.path().join("out.html"),
        &Options::default(),
    );
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!dir.path().join("out.html").exists());
}
