//! Custom style rules: source style name to output tag and classes.
//!
//! Rules are parsed once, up front, into a validated list. Lines that cannot
//! be parsed are collected in [`StyleMap::skipped`] and never abort the run.
//!
//! ```text
//! # comments and blank lines are ignored
//! p[style-name='Abstract'] => section.abstract
//! r[style-name='Code Char'] => code
//! Epigraph => p.epigraph:fresh
//! ```

use std::fmt;

use crate::config::Options;
use crate::dom::{ArenaDom, NodeId};
use crate::engine::STYLE_NAME_ATTR;

/// Which kind of element a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// `p[...]`: block-level elements.
    Paragraph,
    /// `r[...]`: inline runs.
    Run,
    /// Short form `Name => …`: either.
    Any,
}

/// Output tag and classes of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTarget {
    pub tag: String,
    pub classes: Vec<String>,
    /// `:fresh` suffix; accepted for compatibility, has no effect on the tree.
    pub fresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub scope: RuleScope,
    pub style_name: String,
    pub target: StyleTarget,
}

impl StyleRule {
    /// `p[style-name='NAME'] => TAG.CLASS…:fresh`
    pub fn paragraph(style_name: impl Into<String>, tag: &str, classes: &[&str]) -> Self {
        Self {
            scope: RuleScope::Paragraph,
            style_name: style_name.into(),
            target: StyleTarget {
                tag: tag.to_string(),
                classes: classes.iter().map(|c| c.to_string()).collect(),
                fresh: true,
            },
        }
    }

    fn applies_to(&self, dom: &ArenaDom, node: NodeId) -> bool {
        let inline = is_run(dom, node);
        match self.scope {
            RuleScope::Paragraph => !inline,
            RuleScope::Run => inline,
            RuleScope::Any => true,
        }
    }
}

/// A rule line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRuleError {
    /// 1-based line number in the rule text.
    pub line: usize,
    pub rule: String,
    pub reason: String,
}

impl fmt::Display for StyleRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.reason, self.rule)
    }
}

impl std::error::Error for StyleRuleError {}

/// Parsed rules plus the lines that were rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    pub rules: Vec<StyleRule>,
    pub skipped: Vec<StyleRuleError>,
}

impl StyleMap {
    /// Built-in semantic rules followed by the user's rule text.
    pub fn from_options(options: &Options) -> Self {
        let mut map = parse_style_map(&options.style_map);
        for error in &map.skipped {
            log::warn!("skipping style rule {error}");
        }
        let mut rules = builtin_rules(options);
        rules.append(&mut map.rules);
        map.rules = rules;
        map
    }

    /// The first rule matching `style_name` that applies to `node`.
    pub fn rule_for(&self, dom: &ArenaDom, node: NodeId, style_name: &str) -> Option<&StyleRule> {
        self.rules
            .iter()
            .find(|rule| rule.style_name == style_name && rule.applies_to(dom, node))
    }
}

/// Parse rule text, one rule per line.
pub fn parse_style_map(text: &str) -> StyleMap {
    let mut map = StyleMap::default();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_rule(line) {
            Ok(rule) => map.rules.push(rule),
            Err(reason) => map.skipped.push(StyleRuleError {
                line: index + 1,
                rule: line.to_string(),
                reason,
            }),
        }
    }
    map
}

fn parse_rule(line: &str) -> Result<StyleRule, String> {
    let (selector, target) = line
        .split_once("=>")
        .ok_or_else(|| "missing '=>'".to_string())?;
    let (scope, style_name) = parse_selector(selector.trim())?;
    let target = parse_target(target.trim())?;
    Ok(StyleRule {
        scope,
        style_name,
        target,
    })
}

fn parse_selector(selector: &str) -> Result<(RuleScope, String), String> {
    let (scope, rest) = if let Some(rest) = selector.strip_prefix("p[") {
        (RuleScope::Paragraph, rest)
    } else if let Some(rest) = selector.strip_prefix("r[") {
        (RuleScope::Run, rest)
    } else if selector.contains('[') {
        return Err(format!("unsupported selector '{selector}'"));
    } else {
        let name = unquote(selector);
        if name.is_empty() {
            return Err("empty style name".to_string());
        }
        return Ok((RuleScope::Any, name.to_string()));
    };

    let inner = rest
        .strip_suffix(']')
        .ok_or_else(|| "unterminated '['".to_string())?;
    let value = inner
        .trim()
        .strip_prefix("style-name")
        .map(str::trim_start)
        .and_then(|v| v.strip_prefix('='))
        .ok_or_else(|| "expected style-name='…'".to_string())?
        .trim();

    let quoted = value.len() >= 2
        && ((value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"')));
    if !quoted {
        return Err("style name must be quoted".to_string());
    }
    let name = &value[1..value.len() - 1];
    if name.is_empty() {
        return Err("empty style name".to_string());
    }
    Ok((scope, name.to_string()))
}

fn parse_target(target: &str) -> Result<StyleTarget, String> {
    if target.contains('>') {
        return Err("nested targets are not supported".to_string());
    }
    let (path, fresh) = match target.strip_suffix(":fresh") {
        Some(path) => (path, true),
        None => (target, false),
    };

    let mut parts = path.split('.');
    let tag = parts.next().unwrap_or_default().trim();
    if !is_valid_tag(tag) {
        return Err(format!("invalid tag '{tag}'"));
    }
    let classes = parts
        .map(|class| {
            if is_valid_class(class) {
                Ok(class.to_string())
            } else {
                Err(format!("invalid class '{class}'"))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StyleTarget {
        tag: tag.to_ascii_lowercase(),
        classes,
        fresh,
    })
}

fn unquote(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
}

fn is_valid_tag(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_valid_class(class: &str) -> bool {
    !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Rules for the semantic style names carried by the options.
pub fn builtin_rules(options: &Options) -> Vec<StyleRule> {
    let styles = &options.styles;
    let mut rules = Vec::new();
    let mut push = |name: &Option<String>, tag: &str, classes: &[&str]| {
        if let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            rules.push(StyleRule::paragraph(name, tag, classes));
        }
    };

    push(&styles.heading, "h1", &[]);
    push(&styles.media_caption, "p", &[crate::hooks::MEDIA_CAPTION]);
    push(&styles.blockquote, "blockquote", &[]);
    push(&styles.table_caption, "caption", &[]);
    push(&styles.bibliography, "p", &[crate::hooks::BIBLIOGRAPHY]);
    if options.paragraph_numbers {
        push(&styles.exclude_numbering, "p", &[options.exclusion_class()]);
    }
    rules
}

fn is_run(dom: &ArenaDom, node: NodeId) -> bool {
    dom.element_name(node)
        .is_some_and(|name| matches!(&**name, "span" | "strong" | "em" | "b" | "i" | "u" | "code"))
}

/// Pass 1: rewrite every element carrying a style marker that a rule matches.
///
/// Unmatched style names are left as they are.
pub fn apply(dom: &mut ArenaDom, root: NodeId, map: &StyleMap) -> usize {
    let marked = dom.find_all(root, |dom, id| dom.get_attr(id, STYLE_NAME_ATTR).is_some());
    let mut applied = 0;

    for node in marked {
        let Some(style_name) = dom.get_attr(node, STYLE_NAME_ATTR).map(str::to_string) else {
            continue;
        };
        let Some(rule) = map.rule_for(dom, node, &style_name) else {
            log::debug!("no style rule for '{style_name}'; left unchanged");
            continue;
        };
        let target = rule.target.clone();

        dom.rename(node, &target.tag);
        for class in &target.classes {
            dom.add_class(node, class);
        }
        dom.remove_attr(node, STYLE_NAME_ATTR);
        applied += 1;
    }

    log::debug!("style map: {applied} elements restyled");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    #[test]
    fn test_parse_full_and_short_forms() {
        let map = parse_style_map(
            "# comment\n\
             p[style-name='Abstract'] => section.abstract\n\
             r[style-name=\"Code Char\"] => code\n\
             \n\
             Epigraph => p.epigraph.small:fresh\n",
        );
        assert!(map.skipped.is_empty(), "{:?}", map.skipped);
        assert_eq!(map.rules.len(), 3);

        assert_eq!(map.rules[0].scope, RuleScope::Paragraph);
        assert_eq!(map.rules[0].style_name, "Abstract");
        assert_eq!(map.rules[0].target.tag, "section");
        assert_eq!(map.rules[0].target.classes, vec!["abstract"]);

        assert_eq!(map.rules[1].scope, RuleScope::Run);
        assert_eq!(map.rules[1].style_name, "Code Char");

        assert_eq!(map.rules[2].scope, RuleScope::Any);
        assert_eq!(map.rules[2].target.classes, vec!["epigraph", "small"]);
        assert!(map.rules[2].target.fresh);
    }

    #[test]
    fn test_invalid_lines_are_skipped_not_fatal() {
        let map = parse_style_map(
            "Good => p.good\n\
             no arrow here\n\
             p[style-name=Unquoted] => p\n\
             p[style-name='X'] => 9bad\n\
             p[style-name='Y'] => p.\n\
             p[style-name='Z'] => div > p\n\
             table[border] => p\n",
        );
        assert_eq!(map.rules.len(), 1);
        let lines: Vec<usize> = map.skipped.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5, 6, 7]);
        assert!(map.skipped[0].to_string().contains("missing '=>'"));
    }

    #[test]
    fn test_builtin_rules_come_first() {
        let options = Options {
            style_map: "FVMW Heading => h2".to_string(),
            ..Options::default()
        };
        let map = StyleMap::from_options(&options);
        let first = map
            .rules
            .iter()
            .find(|r| r.style_name == "FVMW Heading")
            .unwrap();
        assert_eq!(first.target.tag, "h1");
    }

    #[test]
    fn test_exclusion_rule_only_with_numbering() {
        let off = builtin_rules(&Options::default());
        assert!(!off.iter().any(|r| r.style_name == "FVMW IgnorePNum"));

        let on = builtin_rules(&Options {
            paragraph_numbers: true,
            ..Options::default()
        });
        let rule = on.iter().find(|r| r.style_name == "FVMW IgnorePNum").unwrap();
        assert_eq!(rule.target.classes, vec!["ignorePNum"]);
    }

    #[test]
    fn test_apply_renames_and_strips_marker() {
        let mut parsed = parse_fragment(concat!(
            r#"<p data-style-name="FVMW Media">Figure 1</p>"#,
            r#"<p data-style-name="Unknown Style">Plain</p>"#,
            r#"<p>Run <span data-style-name="Code Char">x</span></p>"#,
        ));
        let options = Options {
            style_map: "r[style-name='Code Char'] => code".to_string(),
            ..Options::default()
        };
        let map = StyleMap::from_options(&options);
        let count = apply(&mut parsed.dom, parsed.body, &map);
        assert_eq!(count, 2);

        let html = serialize_children(&parsed.dom, parsed.body);
        assert!(html.contains(r#"<p class="mediacaption">Figure 1</p>"#), "{html}");
        assert!(html.contains(r#"data-style-name="Unknown Style""#));
        assert!(html.contains("<code>x</code>"));
    }

    #[test]
    fn test_paragraph_rule_ignores_runs() {
        let mut parsed = parse_fragment(r#"<p><span data-style-name="Quote">x</span></p>"#);
        let map = parse_style_map("p[style-name='Quote'] => blockquote");
        assert_eq!(apply(&mut parsed.dom, parsed.body, &map), 0);
    }
}
