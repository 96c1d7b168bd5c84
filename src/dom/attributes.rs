//! Attribute normalization
//!
//! Canonicalizes the raw per-element attribute map into a typed record:
//! duplicated `aria-` prefixes are folded, `class` becomes `class_name`,
//! noisy key families are dropped, and anything unknown lands in a capped
//! diagnostics accumulator instead of failing the build.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

/// Maximum number of unique sample values kept per unknown key
const MAX_SAMPLES_PER_KEY: usize = 5;

/// Maximum length of a stored sample value
const MAX_SAMPLE_LEN: usize = 50;

/// Accumulator for soft attribute-normalization findings.
///
/// Returned alongside the built tree so builds stay deterministic and free
/// of hidden global state. Consumers typically call [`Diagnostics::log_summary`]
/// once per build.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Diagnostics {
    /// Unknown attribute keys with up to five unique sample values each
    unknown_attributes: BTreeMap<String, Vec<String>>,
}

impl Diagnostics {
    /// Record an unknown attribute key with a sample value
    pub fn record_unknown(&mut self, key: &str, value: &str) {
        let samples = self.unknown_attributes.entry(key.to_string()).or_default();
        let mut sample: String = value.chars().take(MAX_SAMPLE_LEN).collect();
        sample.shrink_to_fit();
        if samples.len() < MAX_SAMPLES_PER_KEY && !samples.contains(&sample) {
            samples.push(sample);
        }
    }

    /// Whether anything was recorded
    pub fn is_empty(&self) -> bool {
        self.unknown_attributes.is_empty()
    }

    /// The unknown keys seen during the build
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.unknown_attributes.keys().map(|k| k.as_str())
    }

    /// Emit one consolidated debug log for the whole build
    pub fn log_summary(&self) {
        if self.is_empty() {
            return;
        }
        debug!(
            keys = ?self.unknown_attributes.keys().collect::<Vec<_>>(),
            samples = ?self.unknown_attributes,
            "extra DOM attributes found; consider adding them to the known set"
        );
    }
}

/// Normalized element attributes.
///
/// Only the fields relevant to addressing and rendering survive; the rest
/// of the raw map is either dropped (noisy key families) or recorded in
/// the build [`Diagnostics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomAttributes {
    /// Lowercased element tag name
    pub tag_name: String,
    /// The element `class` attribute (renamed to avoid the keyword)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    // state flags
    /// `modal` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<bool>,
    /// `required` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// `visible` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// `selected` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    /// `checked` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// `enabled` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// `focused` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,
    /// `disabled` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// `pressed` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressed: Option<bool>,
    /// `hidden` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// `expanded` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    // value attributes
    /// Input `type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// `value`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `valuemin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuemin: Option<String>,
    /// `valuemax`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuemax: Option<String>,
    /// `description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `autocomplete`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    /// `haspopup` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haspopup: Option<bool>,
    /// `accesskey`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesskey: Option<String>,
    /// `autofocus` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autofocus: Option<bool>,
    /// `tabindex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabindex: Option<i64>,
    /// `multiselectable` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiselectable: Option<bool>,

    // resource attributes
    /// `href`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// `src`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// `srcset`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
    /// `target`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// `ping`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<String>,
    /// `data-src` lazy-load source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_src: Option<String>,
    /// `data-srcset` lazy-load source set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_srcset: Option<String>,

    // text attributes
    /// `placeholder`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// `title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `alt`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `autocorrect`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocorrect: Option<String>,
    /// `autocapitalize`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocapitalize: Option<String>,
    /// `spellcheck` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spellcheck: Option<bool>,
    /// `maxlength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<i64>,

    // layout attributes
    /// `width`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    /// `height`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// `size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// `rows`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,

    // internationalization attributes
    /// `lang`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// `dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    // aria attributes
    /// Form `action`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Explicit `role`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `aria-label`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// `aria-labelledby`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_labelledby: Option<String>,
    /// `aria-describedby`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_describedby: Option<String>,
    /// `aria-hidden` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_hidden: Option<bool>,
    /// `aria-expanded` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_expanded: Option<bool>,
    /// `aria-controls`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_controls: Option<String>,
    /// `aria-haspopup` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_haspopup: Option<bool>,
    /// `aria-current`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_current: Option<String>,
    /// `aria-autocomplete`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_autocomplete: Option<String>,
    /// `aria-selected` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_selected: Option<bool>,
    /// `aria-modal` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_modal: Option<bool>,
    /// `aria-disabled` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_disabled: Option<bool>,
    /// `aria-valuenow`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_valuenow: Option<i64>,
    /// `aria-live`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_live: Option<String>,
    /// `aria-atomic` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_atomic: Option<bool>,
    /// `aria-valuemax`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_valuemax: Option<i64>,
    /// `aria-valuemin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_valuemin: Option<i64>,
    /// `aria-level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_level: Option<i64>,
    /// `aria-owns`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_owns: Option<String>,
    /// `aria-multiselectable` flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_multiselectable: Option<bool>,
    /// `aria-colindex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_colindex: Option<i64>,
    /// `aria-colspan`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_colspan: Option<i64>,
    /// `aria-rowindex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_rowindex: Option<i64>,
    /// `aria-rowspan`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_rowspan: Option<i64>,
    /// `aria-description`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_description: Option<String>,
    /// `aria-activedescendant`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_activedescendant: Option<String>,
}

/// Keys silently dropped during normalization: framework internals and
/// attributes that are never useful for addressing.
static EXCLUDED_KEYS: &[&str] = &[
    "browser_user_highlight_id",
    "style",
    "id",
    "data_jsl10n",
    "keyshortcuts",
    "for",
    "rel",
    "ng_non_bindable",
    "c_wiz",
    "ssk",
    "soy_skip",
    "key",
    "method",
    "eid",
    "view",
    "pivot",
];

fn excluded_keys() -> &'static HashSet<&'static str> {
    static KEYS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    KEYS.get_or_init(|| EXCLUDED_KEYS.iter().copied().collect())
}

/// Whether a raw key belongs to an ignored (framework-generated) family.
/// `data-src`/`data-srcset` are carved out: they feed the resource-URL
/// precedence chain.
fn is_ignored_key(key: &str) -> bool {
    if key == "data-src" || key == "data-srcset" {
        return false;
    }
    key.starts_with("data-") || key.starts_with("js") || key.starts_with("__") || key.starts_with("g-")
}

/// Fold duplicated or prefixed `aria-` keys into their canonical form
/// (`aria-aria-label` → `aria-label`). Value conflicts are logged; the
/// incoming value wins.
fn canonical_aria_key(key: &str) -> Option<String> {
    let pos = key.rfind("aria-")?;
    if pos == 0 && !key[5..].contains("aria-") {
        return None; // already canonical
    }
    Some(format!("aria-{}", &key[pos + 5..]))
}

/// Lenient boolean parsing for flag attributes. Bare presence (empty
/// value) and the attribute's own name both mean `true`, as in HTML
/// boolean attributes; only an explicit `false`/`0` clears the flag.
fn parse_flag(_key: &str, value: &str) -> bool {
    !(value.eq_ignore_ascii_case("false") || value == "0")
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

impl DomAttributes {
    /// Normalize a raw attribute map for an element.
    ///
    /// Never fails: unknown keys are recorded in `diagnostics`, ignored
    /// families are dropped, and value conflicts during aria folding are
    /// logged with the latest value winning.
    pub fn normalize(
        tag_name: &str,
        raw: &HashMap<String, String>,
        diagnostics: &mut Diagnostics,
    ) -> DomAttributes {
        let mut attrs = DomAttributes {
            tag_name: tag_name.to_ascii_lowercase(),
            ..DomAttributes::default()
        };

        // fold duplicated aria prefixes first so the canonical key is
        // the one dispatched below
        let mut cleaned: HashMap<String, String> = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let canonical = match canonical_aria_key(key) {
                Some(folded) => {
                    if let Some(existing) = raw.get(&folded) {
                        if existing != value {
                            debug!(key = %folded, old = %existing, new = %value, "aria key folded with conflicting values");
                        }
                    }
                    folded
                }
                None => key.clone(),
            };
            cleaned.insert(canonical, value.clone());
        }

        for (key, value) in &cleaned {
            if is_ignored_key(key) {
                continue;
            }
            let field = key.replace('-', "_");
            if excluded_keys().contains(field.as_str()) {
                continue;
            }
            if !attrs.assign(&field, key, value) {
                diagnostics.record_unknown(&field, value);
            }
        }
        attrs
    }

    /// Dispatch one normalized key onto its typed field. Returns `false`
    /// for unknown keys.
    fn assign(&mut self, field: &str, raw_key: &str, value: &str) -> bool {
        let v = value.to_string();
        match field {
            "class" | "class_name" => self.class_name = Some(v),
            "modal" => self.modal = Some(parse_flag(raw_key, value)),
            "required" => self.required = Some(parse_flag(raw_key, value)),
            "visible" => self.visible = Some(parse_flag(raw_key, value)),
            "selected" => self.selected = Some(parse_flag(raw_key, value)),
            "checked" => self.checked = Some(parse_flag(raw_key, value)),
            "enabled" => self.enabled = Some(parse_flag(raw_key, value)),
            "focused" => self.focused = Some(parse_flag(raw_key, value)),
            "disabled" => self.disabled = Some(parse_flag(raw_key, value)),
            "pressed" => self.pressed = Some(parse_flag(raw_key, value)),
            "hidden" => self.hidden = Some(parse_flag(raw_key, value)),
            "expanded" => self.expanded = Some(parse_flag(raw_key, value)),
            "type" => self.input_type = Some(v),
            "value" => self.value = Some(v),
            "valuemin" => self.valuemin = Some(v),
            "valuemax" => self.valuemax = Some(v),
            "description" => self.description = Some(v),
            "autocomplete" => self.autocomplete = Some(v),
            "haspopup" => self.haspopup = Some(parse_flag(raw_key, value)),
            "accesskey" => self.accesskey = Some(v),
            "autofocus" => self.autofocus = Some(parse_flag(raw_key, value)),
            "tabindex" => self.tabindex = parse_int(value),
            "multiselectable" => self.multiselectable = Some(parse_flag(raw_key, value)),
            "href" => self.href = Some(v),
            "src" => self.src = Some(v),
            "srcset" => self.srcset = Some(v),
            "target" => self.target = Some(v),
            "ping" => self.ping = Some(v),
            "data_src" => self.data_src = Some(v),
            "data_srcset" => self.data_srcset = Some(v),
            "placeholder" => self.placeholder = Some(v),
            "title" => self.title = Some(v),
            "alt" => self.alt = Some(v),
            "name" => self.name = Some(v),
            "autocorrect" => self.autocorrect = Some(v),
            "autocapitalize" => self.autocapitalize = Some(v),
            "spellcheck" => self.spellcheck = Some(parse_flag(raw_key, value)),
            "maxlength" => self.maxlength = parse_int(value),
            "width" => self.width = parse_int(value),
            "height" => self.height = parse_int(value),
            "size" => self.size = parse_int(value),
            "rows" => self.rows = parse_int(value),
            "lang" => self.lang = Some(v),
            "dir" => self.dir = Some(v),
            "action" => self.action = Some(v),
            "role" => self.role = Some(v),
            "aria_label" => self.aria_label = Some(v),
            "aria_labelledby" => self.aria_labelledby = Some(v),
            "aria_describedby" => self.aria_describedby = Some(v),
            "aria_hidden" => self.aria_hidden = Some(parse_flag(raw_key, value)),
            "aria_expanded" => self.aria_expanded = Some(parse_flag(raw_key, value)),
            "aria_controls" => self.aria_controls = Some(v),
            "aria_haspopup" => self.aria_haspopup = Some(parse_flag(raw_key, value)),
            "aria_current" => self.aria_current = Some(v),
            "aria_autocomplete" => self.aria_autocomplete = Some(v),
            "aria_selected" => self.aria_selected = Some(parse_flag(raw_key, value)),
            "aria_modal" => self.aria_modal = Some(parse_flag(raw_key, value)),
            "aria_disabled" => self.aria_disabled = Some(parse_flag(raw_key, value)),
            "aria_valuenow" => self.aria_valuenow = parse_int(value),
            "aria_live" => self.aria_live = Some(v),
            "aria_atomic" => self.aria_atomic = Some(parse_flag(raw_key, value)),
            "aria_valuemax" => self.aria_valuemax = parse_int(value),
            "aria_valuemin" => self.aria_valuemin = parse_int(value),
            "aria_level" => self.aria_level = parse_int(value),
            "aria_owns" => self.aria_owns = Some(v),
            "aria_multiselectable" => self.aria_multiselectable = Some(parse_flag(raw_key, value)),
            "aria_colindex" => self.aria_colindex = parse_int(value),
            "aria_colspan" => self.aria_colspan = parse_int(value),
            "aria_rowindex" => self.aria_rowindex = parse_int(value),
            "aria_rowspan" => self.aria_rowspan = parse_int(value),
            "aria_description" => self.aria_description = Some(v),
            "aria_activedescendant" => self.aria_activedescendant = Some(v),
            _ => return false,
        }
        true
    }

    /// Best resource URL for the element, in precedence order:
    /// src > srcset > data-src > data-srcset > target > href.
    pub fn resource_url(&self) -> Option<&str> {
        [
            &self.src,
            &self.srcset,
            &self.data_src,
            &self.data_srcset,
            &self.target,
            &self.href,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.as_str())
        .find(|s| !s.is_empty())
    }

    /// Project the non-empty attributes into a flat map for rendering.
    ///
    /// Layout and identity fields (`tag_name`, `class_name`, sizes, i18n,
    /// `role`, `aria_label`, `name`) are hidden unless explicitly included;
    /// long string values are truncated with an ellipsis.
    pub fn relevant_attrs(
        &self,
        include: Option<&HashSet<&str>>,
        max_len_per_attribute: Option<usize>,
    ) -> serde_json::Map<String, serde_json::Value> {
        static DISABLED: &[&str] = &[
            "tag_name",
            "class_name",
            "width",
            "height",
            "size",
            "lang",
            "dir",
            "action",
            "role",
            "aria_label",
            "name",
        ];
        let mut out = serde_json::Map::new();
        let serde_json::Value::Object(fields) = serde_json::to_value(self).unwrap_or_default() else {
            return out;
        };
        for (key, value) in fields {
            if value.is_null() {
                continue;
            }
            let included = include.map(|set| set.contains(key.as_str()));
            if included == Some(false) {
                continue;
            }
            if included != Some(true) && DISABLED.contains(&key.as_str()) {
                continue;
            }
            let value = match (&value, max_len_per_attribute) {
                (serde_json::Value::String(s), Some(max)) if s.len() > max => {
                    let truncated: String = s.chars().take(max).collect();
                    serde_json::Value::String(format!("{truncated}..."))
                }
                _ => value,
            };
            out.insert(key, value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_normalization() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "INPUT",
            &raw(&[("type", "text"), ("placeholder", "Search"), ("class", "search-bar")]),
            &mut diag,
        );
        assert_eq!(attrs.tag_name, "input");
        assert_eq!(attrs.input_type.as_deref(), Some("text"));
        assert_eq!(attrs.placeholder.as_deref(), Some("Search"));
        assert_eq!(attrs.class_name.as_deref(), Some("search-bar"));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_aria_prefix_folding() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "button",
            &raw(&[("aria-aria-label", "Close"), ("aria-hidden", "true")]),
            &mut diag,
        );
        assert_eq!(attrs.aria_label.as_deref(), Some("Close"));
        assert_eq!(attrs.aria_hidden, Some(true));
    }

    #[test]
    fn test_ignored_prefixes_dropped_silently() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "div",
            &raw(&[
                ("data-testid", "root"),
                ("jscontroller", "abc"),
                ("__internal", "1"),
                ("g-tooltip", "x"),
            ]),
            &mut diag,
        );
        assert!(diag.is_empty());
        assert_eq!(attrs.class_name, None);
    }

    #[test]
    fn test_data_src_survives_ignored_family() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "img",
            &raw(&[("data-src", "https://cdn.example.com/a.png")]),
            &mut diag,
        );
        assert_eq!(attrs.data_src.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(attrs.resource_url(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_unknown_keys_go_to_diagnostics() {
        let mut diag = Diagnostics::default();
        let _ = DomAttributes::normalize("div", &raw(&[("frobnicate", "yes")]), &mut diag);
        assert!(!diag.is_empty());
        assert_eq!(diag.unknown_keys().collect::<Vec<_>>(), vec!["frobnicate"]);
    }

    #[test]
    fn test_diagnostics_caps_samples() {
        let mut diag = Diagnostics::default();
        for i in 0..10 {
            diag.record_unknown("widget", &format!("value-{i}"));
        }
        assert_eq!(diag.unknown_attributes["widget"].len(), MAX_SAMPLES_PER_KEY);
    }

    #[test]
    fn test_diagnostics_truncates_and_dedups() {
        let mut diag = Diagnostics::default();
        let long = "x".repeat(200);
        diag.record_unknown("widget", &long);
        diag.record_unknown("widget", &long);
        assert_eq!(diag.unknown_attributes["widget"].len(), 1);
        assert_eq!(diag.unknown_attributes["widget"][0].len(), MAX_SAMPLE_LEN);
    }

    #[test]
    fn test_resource_url_precedence() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "a",
            &raw(&[("href", "/page"), ("src", "image.png")]),
            &mut diag,
        );
        assert_eq!(attrs.resource_url(), Some("image.png"));

        let attrs = DomAttributes::normalize("a", &raw(&[("href", "/page")]), &mut diag);
        assert_eq!(attrs.resource_url(), Some("/page"));
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("hidden", ""));
        assert!(parse_flag("hidden", "hidden"));
        assert!(parse_flag("aria-hidden", "true"));
        assert!(!parse_flag("aria-hidden", "false"));
        assert!(!parse_flag("checked", "0"));
    }

    #[test]
    fn test_relevant_attrs_hides_layout_fields() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "input",
            &raw(&[("placeholder", "Email"), ("lang", "en"), ("width", "200")]),
            &mut diag,
        );
        let projected = attrs.relevant_attrs(None, None);
        assert!(projected.contains_key("placeholder"));
        assert!(!projected.contains_key("lang"));
        assert!(!projected.contains_key("width"));
        assert!(!projected.contains_key("tag_name"));
    }

    #[test]
    fn test_relevant_attrs_truncation() {
        let mut diag = Diagnostics::default();
        let attrs = DomAttributes::normalize(
            "a",
            &raw(&[("title", "a very long tooltip describing the link target")]),
            &mut diag,
        );
        let projected = attrs.relevant_attrs(None, Some(10));
        let title = projected["title"].as_str().unwrap();
        assert!(title.ends_with("..."));
        assert_eq!(title.len(), 13);
    }
}
