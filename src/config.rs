//! Conversion options.
//!
//! One immutable [`Options`] value is built up front (from CLI flags or a
//! JSON options file) and passed by reference to every pass. Numeric fields
//! are kept as the raw text the user typed; malformed values fall back to
//! "disabled" or the default instead of failing the run.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// How navigation entries are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    /// `<p><a href="#id">Label</a></p>`
    #[default]
    Paragraph,
    /// `<button><a href="#id">Label</a></button>`
    Button,
}

impl std::str::FromStr for NavigationStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraph" | "p" => Ok(NavigationStyle::Paragraph),
            "button" => Ok(NavigationStyle::Button),
            other => Err(format!("unknown navigation style '{other}'")),
        }
    }
}

/// Source-document style names that map onto built-in semantic targets.
///
/// An empty or missing name disables that mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticStyles {
    pub heading: Option<String>,
    pub media_caption: Option<String>,
    pub blockquote: Option<String>,
    pub table_caption: Option<String>,
    pub bibliography: Option<String>,
    pub exclude_numbering: Option<String>,
}

impl Default for SemanticStyles {
    fn default() -> Self {
        Self {
            heading: Some("FVMW Heading".to_string()),
            media_caption: Some("FVMW Media".to_string()),
            blockquote: Some("FVMW Blockquote".to_string()),
            table_caption: Some("FVMW TableCaption".to_string()),
            bibliography: Some("FVMW Bibliography".to_string()),
            exclude_numbering: Some("FVMW IgnorePNum".to_string()),
        }
    }
}

/// Every switch the enrichment pipeline and the assembler read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emit only the `<body>` fragment, without doctype or head.
    pub body_only: bool,
    /// Embed the companion stylesheet in the head.
    pub insert_css: bool,
    /// Embed the scroll-highlight script.
    pub insert_script: bool,
    /// Document title (full documents only).
    pub page_title: Option<String>,

    /// Assign ids to h1–h3.
    pub heading_ids: bool,
    /// Build the navigation column.
    pub navigation: bool,
    pub navigation_style: NavigationStyle,

    /// Turn footnote references into tooltips.
    pub tooltips: bool,
    /// Abbreviate tooltip text after this many characters (raw user input).
    #[serde(deserialize_with = "lenient_text")]
    pub abbreviate_tooltips: String,

    /// Prefix eligible paragraphs with `[N]`.
    pub paragraph_numbers: bool,
    /// Class that opts a paragraph out of numbering.
    pub paragraph_exclusion_class: String,

    /// Insert `{N}` page markers at page breaks.
    pub page_numbers: bool,
    /// Number of the first page (raw user input).
    #[serde(deserialize_with = "lenient_text")]
    pub first_page: String,

    /// Additional style-map rules, one per line.
    pub style_map: String,
    pub styles: SemanticStyles,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            body_only: true,
            insert_css: false,
            insert_script: false,
            page_title: None,
            heading_ids: true,
            navigation: false,
            navigation_style: NavigationStyle::Paragraph,
            tooltips: true,
            abbreviate_tooltips: "500".to_string(),
            paragraph_numbers: false,
            paragraph_exclusion_class: DEFAULT_EXCLUSION_CLASS.to_string(),
            page_numbers: true,
            first_page: "1".to_string(),
            style_map: String::new(),
            styles: SemanticStyles::default(),
        }
    }
}

/// Class given to paragraphs mapped from the numbering-exclusion style.
pub const DEFAULT_EXCLUSION_CLASS: &str = "ignorePNum";

impl Options {
    /// Parse a (possibly partial) JSON options document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Tooltip abbreviation length, or `None` to keep the full rich copy.
    ///
    /// Empty input means "unset"; anything that is not a positive integer
    /// disables abbreviation with a warning.
    pub fn tooltip_limit(&self) -> Option<usize> {
        let raw = self.abbreviate_tooltips.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                log::warn!(
                    "tooltip abbreviation '{raw}' is not a positive integer; tooltips are not abbreviated"
                );
                None
            }
        }
    }

    /// First page number, defaulting to 1 on empty or malformed input.
    pub fn first_page_number(&self) -> u32 {
        let raw = self.first_page.trim();
        if raw.is_empty() {
            return 1;
        }
        match raw.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                log::warn!("first page number '{raw}' is not a positive integer; starting at 1");
                1
            }
        }
    }

    /// The exclusion class, falling back to the default when left blank.
    pub fn exclusion_class(&self) -> &str {
        let class = self.paragraph_exclusion_class.trim();
        if class.is_empty() {
            DEFAULT_EXCLUSION_CLASS
        } else {
            class
        }
    }

    /// Resolve options that contradict each other.
    ///
    /// A body-only export has no head, so the stylesheet, script and title
    /// are dropped.
    pub fn normalized(&self) -> Options {
        let mut options = self.clone();
        if options.body_only {
            if options.insert_css {
                log::warn!("body-only export: ignoring the companion stylesheet");
                options.insert_css = false;
            }
            if options.insert_script {
                log::warn!("body-only export: ignoring the scroll-highlight script");
                options.insert_script = false;
            }
            if options.page_title.take().is_some_and(|t| !t.trim().is_empty()) {
                log::warn!("body-only export: ignoring the page title");
            }
        }
        options
    }
}

/// Accept a JSON string, number or null for a field typed in by hand.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reset_state() {
        let options = Options::default();
        assert!(options.body_only);
        assert!(options.heading_ids);
        assert!(!options.navigation);
        assert!(options.tooltips);
        assert_eq!(options.tooltip_limit(), Some(500));
        assert!(options.page_numbers);
        assert_eq!(options.first_page_number(), 1);
    }

    #[test]
    fn test_tooltip_limit_fallbacks() {
        let mut options = Options::default();
        for raw in ["", "  ", "abc", "0", "-3", "2.5"] {
            options.abbreviate_tooltips = raw.to_string();
            assert_eq!(options.tooltip_limit(), None, "input {raw:?}");
        }
        options.abbreviate_tooltips = " 20 ".to_string();
        assert_eq!(options.tooltip_limit(), Some(20));
    }

    #[test]
    fn test_first_page_fallbacks() {
        let mut options = Options::default();
        for raw in ["", "x", "0", "-1"] {
            options.first_page = raw.to_string();
            assert_eq!(options.first_page_number(), 1, "input {raw:?}");
        }
        options.first_page = "5".to_string();
        assert_eq!(options.first_page_number(), 5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = Options::from_json_str(
            r#"{"navigation": true, "navigation_style": "button", "first_page": 5}"#,
        )
        .unwrap();
        assert!(options.navigation);
        assert_eq!(options.navigation_style, NavigationStyle::Button);
        assert_eq!(options.first_page_number(), 5);
        assert!(options.tooltips);
        assert_eq!(options.styles.heading.as_deref(), Some("FVMW Heading"));
    }

    #[test]
    fn test_numeric_fields_accept_strings_and_null() {
        let options =
            Options::from_json_str(r#"{"abbreviate_tooltips": null, "first_page": "12"}"#).unwrap();
        assert_eq!(options.tooltip_limit(), None);
        assert_eq!(options.first_page_number(), 12);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Options::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_body_only_drops_head_options() {
        let options = Options {
            body_only: true,
            insert_css: true,
            insert_script: true,
            page_title: Some("Paper".to_string()),
            ..Options::default()
        };
        let normalized = options.normalized();
        assert!(!normalized.insert_css);
        assert!(!normalized.insert_script);
        assert_eq!(normalized.page_title, None);

        let full = Options {
            body_only: false,
            ..options
        };
        assert!(full.normalized().insert_css);
    }

    #[test]
    fn test_navigation_style_from_str() {
        assert_eq!("Button".parse::<NavigationStyle>(), Ok(NavigationStyle::Button));
        assert_eq!("paragraph".parse::<NavigationStyle>(), Ok(NavigationStyle::Paragraph));
        assert!("menu".parse::<NavigationStyle>().is_err());
    }
}
