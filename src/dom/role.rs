//! Accessibility role taxonomy
//!
//! This module defines the node kinds, role categories and the full
//! accessibility role set, together with the static lookup tables that
//! drive role→category, role→id-prefix and tag→role mapping. Keeping the
//! mapping as data makes it unit-testable in isolation and extensible
//! without touching control flow.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Coarse node classification used by the reduced tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Pure text leaf
    Text,
    /// Interactive element (clickable, fillable, selectable)
    Interaction,
    /// Image-like element
    Image,
    /// Anything else
    Other,
}

/// Category a role belongs to; each role maps to exactly one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Layout-only containers (group, generic, main, ...)
    Structural,
    /// Informational containers (dialog, navigation, form, ...)
    DataDisplay,
    /// Text content roles
    Text,
    /// Actionable roles (button, link, textbox, ...)
    Interaction,
    /// Table roles
    Table,
    /// List roles
    List,
    /// Image roles
    Image,
    /// Code and math roles
    Code,
    /// Tree widget roles
    Tree,
    /// Everything else (separator, progressbar, iframe, ...)
    Other,
}

macro_rules! node_roles {
    ($(($variant:ident, $name:literal, $category:ident, $prefix:expr)),+ $(,)?) => {
        /// The accessibility roles recognized by the engine.
        ///
        /// Roles outside this set survive as raw strings in [`Role::Raw`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum NodeRole {
            $($variant),+
        }

        /// One row of the static role table
        struct RoleInfo {
            role: NodeRole,
            name: &'static str,
            category: NodeCategory,
            prefix: Option<char>,
        }

        /// Role table, ordered identically to the enum discriminants so a
        /// role indexes its own row.
        static ROLE_TABLE: &[RoleInfo] = &[
            $(RoleInfo {
                role: NodeRole::$variant,
                name: $name,
                category: NodeCategory::$category,
                prefix: $prefix,
            }),+
        ];
    };
}

node_roles! {
    // structural
    (Application, "application", Structural, None),
    (Generic, "generic", Structural, None),
    (Group, "group", Structural, None),
    (Main, "main", Structural, None),
    (NoneRole, "none", Structural, None),
    (WebArea, "WebArea", Structural, None),
    // data display
    (Alert, "alert", DataDisplay, None),
    (AlertDialog, "alertdialog", DataDisplay, None),
    (Article, "article", DataDisplay, None),
    (Banner, "banner", DataDisplay, None),
    (Directory, "directory", DataDisplay, None),
    (Document, "document", DataDisplay, None),
    (Dialog, "dialog", DataDisplay, None),
    (Feed, "feed", DataDisplay, None),
    (Navigation, "navigation", DataDisplay, None),
    (Menubar, "menubar", DataDisplay, None),
    (RadioGroup, "radiogroup", DataDisplay, None),
    (Region, "region", DataDisplay, None),
    (Search, "search", DataDisplay, None),
    (TabList, "tablist", DataDisplay, None),
    (TabPanel, "tabpanel", DataDisplay, None),
    (Toolbar, "toolbar", DataDisplay, None),
    (Tooltip, "tooltip", DataDisplay, None),
    (Form, "form", DataDisplay, None),
    (Menu, "menu", DataDisplay, None),
    (MenuListPopup, "MenuListPopup", DataDisplay, None),
    (Modal, "modal", DataDisplay, None),
    // text
    (Text, "text", Text, None),
    (LabelText, "LabelText", Text, None),
    (Heading, "heading", Text, None),
    (Paragraph, "paragraph", Text, None),
    (Blockquote, "blockquote", Text, None),
    (Caption, "caption", Text, None),
    (ContentInfo, "contentinfo", Text, None),
    (Definition, "definition", Text, None),
    (Emphasis, "emphasis", Text, None),
    (Log, "log", Text, None),
    (Note, "note", Text, None),
    (Status, "status", Text, None),
    (Strong, "strong", Text, None),
    (Subscript, "subscript", Text, None),
    (Superscript, "superscript", Text, None),
    (Term, "term", Text, None),
    (Time, "time", Text, None),
    (LineBreak, "LineBreak", Text, None),
    (DescriptionList, "DescriptionList", Text, None),
    // interaction
    (Button, "button", Interaction, Some('B')),
    (Link, "link", Interaction, Some('L')),
    (Combobox, "combobox", Interaction, Some('I')),
    (Listbox, "listbox", Interaction, Some('I')),
    (Textbox, "textbox", Interaction, Some('I')),
    (Checkbox, "checkbox", Interaction, Some('B')),
    (Searchbox, "searchbox", Interaction, Some('I')),
    (Radio, "radio", Interaction, Some('B')),
    (Tab, "tab", Interaction, Some('B')),
    (MenuItem, "menuitem", Interaction, Some('B')),
    (MenuItemCheckbox, "menuitemcheckbox", Interaction, Some('B')),
    (MenuItemRadio, "menuitemradio", Interaction, Some('B')),
    (Slider, "slider", Interaction, Some('I')),
    (Switch, "switch", Interaction, Some('B')),
    (OptionRole, "option", Interaction, Some('O')),
    // table
    (Table, "table", Table, None),
    (Row, "row", Table, None),
    (Column, "column", Table, None),
    (Cell, "cell", Table, None),
    (ColumnHeader, "columnheader", Table, None),
    (Grid, "grid", Table, None),
    (GridCell, "gridcell", Table, None),
    (RowGroup, "rowgroup", Table, None),
    (RowHeader, "rowheader", Table, None),
    // list
    (List, "list", List, None),
    (ListItem, "listitem", List, None),
    (ListMarker, "listmarker", List, None),
    // code
    (Code, "code", Code, None),
    (Math, "math", Code, None),
    // image
    (Figure, "figure", Image, Some('F')),
    (Img, "img", Image, Some('F')),
    (Image, "image", Image, Some('F')),
    // other
    (Iframe, "Iframe", Other, None),
    (Complementary, "complementary", Other, None),
    (Deletion, "deletion", Other, None),
    (Insertion, "insertion", Other, None),
    (Marquee, "marquee", Other, None),
    (Meter, "meter", Other, None),
    (Presentation, "presentation", Other, None),
    (Progressbar, "progressbar", Other, None),
    (Scrollbar, "scrollbar", Other, None),
    (Separator, "separator", Other, None),
    (Spinbutton, "spinbutton", Other, None),
    (Timer, "timer", Other, None),
    // tree
    (Tree, "tree", Tree, None),
    (TreeGrid, "treegrid", Tree, None),
    (TreeItem, "treeitem", Tree, None),
}

fn role_lookup() -> &'static HashMap<String, NodeRole> {
    static LOOKUP: OnceLock<HashMap<String, NodeRole>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        ROLE_TABLE
            .iter()
            .map(|info| (info.name.to_ascii_lowercase(), info.role))
            .collect()
    })
}

impl NodeRole {
    fn info(self) -> &'static RoleInfo {
        &ROLE_TABLE[self as usize]
    }

    /// Canonical string form of the role
    pub fn as_str(self) -> &'static str {
        self.info().name
    }

    /// The single category this role belongs to
    pub fn category(self) -> NodeCategory {
        self.info().category
    }

    /// The short id prefix for interactive roles (`L`, `B`, `I`, `F`, `O`).
    ///
    /// Returns `None` for roles that never receive ids. Ids are shown
    /// verbatim to an LLM or human, so they stay short and role-typed.
    pub fn id_prefix(self) -> Option<char> {
        self.info().prefix
    }

    /// Case-insensitive lookup of a role by its string form
    pub fn from_value(value: &str) -> Option<NodeRole> {
        role_lookup().get(&value.to_ascii_lowercase()).copied()
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node role: either a recognized accessibility role or a raw string
/// for roles outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Recognized role
    Known(NodeRole),
    /// Unmapped role, kept verbatim
    Raw(String),
}

impl Role {
    /// Parse a role string, falling back to [`Role::Raw`] when unmapped
    pub fn from_value(value: &str) -> Role {
        match NodeRole::from_value(value) {
            Some(role) => Role::Known(role),
            None => Role::Raw(value.to_string()),
        }
    }

    /// String form of the role
    pub fn as_str(&self) -> &str {
        match self {
            Role::Known(role) => role.as_str(),
            Role::Raw(raw) => raw.as_str(),
        }
    }

    /// Category of the role; raw roles fall into [`NodeCategory::Other`]
    pub fn category(&self) -> NodeCategory {
        match self {
            Role::Known(role) => role.category(),
            Role::Raw(_) => NodeCategory::Other,
        }
    }

    /// Whether the role belongs to the interaction category
    pub fn is_interaction(&self) -> bool {
        self.category() == NodeCategory::Interaction
    }

    /// Short id prefix; with `force` set, unmapped interactive roles get
    /// `M` (logged) instead of `None` so they stay addressable.
    pub fn id_prefix(&self, force: bool) -> Option<char> {
        let prefix = match self {
            Role::Known(role) => role.id_prefix(),
            Role::Raw(_) => None,
        };
        match (prefix, force) {
            (Some(c), _) => Some(c),
            (None, true) => {
                tracing::debug!(role = %self.as_str(), "no short id prefix for role, forcing 'M'");
                Some('M')
            }
            (None, false) => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Role::from_value(&value))
    }
}

/// Static tag→role rows for elements without an explicit ARIA role
static TAG_ROLES: &[(&str, &str)] = &[
    // structural elements
    ("body", "WebArea"),
    ("nav", "navigation"),
    ("main", "main"),
    ("header", "banner"),
    ("footer", "contentinfo"),
    ("aside", "complementary"),
    ("section", "article"),
    ("article", "article"),
    ("div", "group"),
    // interactive elements
    ("a", "link"),
    ("button", "button"),
    ("select", "combobox"),
    ("textarea", "textbox"),
    ("option", "option"),
    // text elements
    ("h1", "heading"),
    ("h2", "heading"),
    ("h3", "heading"),
    ("h4", "heading"),
    ("h5", "heading"),
    ("h6", "heading"),
    ("p", "paragraph"),
    ("span", "text"),
    ("strong", "text"),
    ("em", "text"),
    ("small", "text"),
    ("bdi", "text"),
    ("i", "text"),
    ("label", "LabelText"),
    ("blockquote", "blockquote"),
    ("code", "code"),
    ("pre", "code"),
    ("time", "time"),
    ("br", "LineBreak"),
    // list elements
    ("ul", "list"),
    ("ol", "list"),
    ("dl", "list"),
    ("li", "listitem"),
    ("dt", "listitem"),
    ("dd", "listitem"),
    // table elements
    ("table", "table"),
    ("tr", "row"),
    ("td", "cell"),
    ("th", "columnheader"),
    ("thead", "rowgroup"),
    ("tbody", "rowgroup"),
    ("tfoot", "rowgroup"),
    // media elements
    ("img", "img"),
    ("figure", "figure"),
    ("iframe", "Iframe"),
    // form elements
    ("form", "form"),
    ("fieldset", "group"),
    ("dialog", "dialog"),
    ("progress", "progressbar"),
    ("meter", "meter"),
    // menu elements
    ("menu", "menu"),
    ("menuitem", "menuitem"),
    ("hr", "separator"),
];

fn tag_lookup() -> &'static HashMap<&'static str, &'static str> {
    static LOOKUP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    LOOKUP.get_or_init(|| TAG_ROLES.iter().copied().collect())
}

/// Role of an `<input>` element, dispatched on its `type` attribute
fn input_role(input_type: &str) -> &'static str {
    match input_type {
        "button" | "submit" | "reset" => "button",
        "radio" => "radio",
        "checkbox" => "checkbox",
        "search" => "searchbox",
        _ => "textbox",
    }
}

/// Compute the accessibility role for an element.
///
/// An explicit `role` attribute wins; otherwise the tag table applies,
/// with `<input>` dispatched on its `type` attribute. Custom tags whose
/// name embeds a known widget flavor (menu, dialog, popup) map to that
/// flavor; everything else is `generic`.
pub fn element_role(tag_name: &str, attributes: &HashMap<String, String>) -> String {
    if let Some(role) = attributes.get("role") {
        if !role.is_empty() {
            return role.clone();
        }
    }
    let tag = tag_name.to_ascii_lowercase();
    if tag == "input" {
        let input_type = attributes
            .get("type")
            .map(|t| t.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string());
        return input_role(&input_type).to_string();
    }
    if let Some(role) = tag_lookup().get(tag.as_str()) {
        return (*role).to_string();
    }
    // custom-element fallback: match widget flavors embedded in the tag name
    let clean_tag: String = tag.chars().filter(|c| *c != '-' && *c != '_').collect();
    for flavor in ["menuitemcheckbox", "menuitemradio", "menuitem", "menu", "dialog"] {
        if clean_tag.contains(flavor) {
            return flavor.to_string();
        }
    }
    if clean_tag.contains("popup") {
        return "MenuListPopup".to_string();
    }
    "generic".to_string()
}
