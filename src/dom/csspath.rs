//! Deterministic XPath→CSS translation and selector augmentation
//!
//! Produces a CSS selector for an element from its xpath, class tokens
//! and a curated allow-list of stable attributes. Building a selector
//! must never fail: any internal problem degrades to the
//! `tag[highlight_index='N']` fallback.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::trace;

fn class_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid class token regex"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Attributes stable enough to appear in generated selectors
static SAFE_ATTRIBUTES: &[&str] = &[
    "id",
    // standard HTML attributes
    "name",
    "type",
    "placeholder",
    // accessibility attributes
    "aria-label",
    "aria-labelledby",
    "aria-describedby",
    "role",
    // common form attributes
    "for",
    "autocomplete",
    "required",
    "readonly",
    // media attributes
    "alt",
    "title",
    "src",
    "href",
    "target",
];

/// Stable application-specific attributes, appended when dynamic
/// attributes are enabled
static DYNAMIC_ATTRIBUTES: &[&str] = &["data-id", "data-qa", "data-cy", "data-testid"];

/// Convert a simple XPath expression to a CSS selector.
///
/// Index predicates translate to positional pseudo-classes:
/// `[n]` → `:nth-of-type(n)`, `[last()]` → `:last-of-type`,
/// `[position()>1]` → `:nth-of-type(n+2)`.
pub fn xpath_to_css_path(xpath: &str) -> String {
    let mut css_parts: Vec<String> = Vec::new();
    for part in xpath.trim_start_matches('/').split('/') {
        if part.is_empty() {
            continue;
        }
        match part.find('[') {
            Some(bracket) => {
                let mut base = part[..bracket].to_string();
                let index_part = &part[bracket..];
                for idx in index_part.split(']') {
                    let idx = idx.trim_matches(['[', ']']);
                    if idx.is_empty() {
                        continue;
                    }
                    if let Ok(n) = idx.parse::<usize>() {
                        base.push_str(&format!(":nth-of-type({n})"));
                    } else if idx == "last()" {
                        base.push_str(":last-of-type");
                    } else if idx.contains("position()") && idx.contains(">1") {
                        base.push_str(":nth-of-type(n+2)");
                    }
                }
                css_parts.push(base);
            }
            None => css_parts.push(part.to_string()),
        }
    }
    css_parts.join(" > ")
}

/// Build a CSS selector for an element.
///
/// Appends valid class tokens and safe-attribute qualifiers to the
/// xpath-derived base. Attribute values containing characters that are
/// illegal inside a quoted CSS string switch to a collapsed `*=`
/// substring match. Never returns an error: on any internal failure the
/// selector degrades to `tag[highlight_index='N']`.
pub fn build_csspath(
    tag_name: &str,
    xpath: &str,
    attributes: &HashMap<String, String>,
    highlight_index: Option<u32>,
    include_dynamic_attributes: bool,
) -> String {
    build_csspath_inner(xpath, attributes, include_dynamic_attributes).unwrap_or_else(|| {
        trace!(tag = tag_name, xpath, "css path construction degraded to highlight fallback");
        format!(
            "{}[highlight_index='{}']",
            tag_name,
            highlight_index.map(|i| i.to_string()).unwrap_or_else(|| "none".to_string())
        )
    })
}

fn build_csspath_inner(
    xpath: &str,
    attributes: &HashMap<String, String>,
    include_dynamic_attributes: bool,
) -> Option<String> {
    let mut css_selector = xpath_to_css_path(xpath);
    if css_selector.is_empty() {
        return None;
    }

    // class tokens, invalid ones skipped
    if include_dynamic_attributes {
        if let Some(classes) = attributes.get("class") {
            for class_name in classes.split_whitespace() {
                if class_token_pattern().is_match(class_name) {
                    css_selector.push('.');
                    css_selector.push_str(class_name);
                } else {
                    trace!(class = class_name, "skipping invalid css class token");
                }
            }
        }
    }

    let is_safe = |attr: &str| {
        SAFE_ATTRIBUTES.contains(&attr)
            || (include_dynamic_attributes && DYNAMIC_ATTRIBUTES.contains(&attr))
    };

    // deterministic output: sort the attribute qualifiers
    let mut safe_attrs: Vec<(&String, &String)> = attributes
        .iter()
        .filter(|(attr, _)| *attr != "class" && !attr.trim().is_empty() && is_safe(attr))
        .collect();
    safe_attrs.sort_by_key(|(attr, _)| attr.as_str());

    for (attribute, value) in safe_attrs {
        let safe_attribute = attribute.replace(':', "\\:");
        if value.is_empty() {
            css_selector.push_str(&format!("[{safe_attribute}]"));
        } else if value.chars().any(|c| "\"'<>`\n\r\t".contains(c)) {
            // substring match on a whitespace-collapsed, quote-escaped value
            let collapsed = whitespace_pattern().replace_all(value, " ");
            let safe_value = collapsed.trim().replace('"', "\\\"");
            css_selector.push_str(&format!("[{safe_attribute}*=\"{safe_value}\"]"));
        } else {
            css_selector.push_str(&format!("[{safe_attribute}=\"{value}\"]"));
        }
    }

    Some(css_selector)
}
