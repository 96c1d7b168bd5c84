//! Page snapshot wrapper
//!
//! Bundles a processed tree with the page metadata captured alongside it
//! (title, URL, viewport, open tabs, capture time) and offers the
//! consumer-facing comparison entry points: interaction-set equality
//! between snapshots and the unseen-id delta.

use crate::dom::node::{DomTree, InteractionNode};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use url::Url;

pub use crate::dom::diff::diff_new_ids;

/// One open browser tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabData {
    /// Tab index within the browsing context
    pub tab_id: u32,
    /// Tab title
    pub title: String,
    /// Tab URL
    pub url: String,
}

/// Scroll and viewport geometry at capture time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportData {
    /// Horizontal scroll offset in pixels
    pub scroll_x: u32,
    /// Vertical scroll offset in pixels
    pub scroll_y: u32,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Full document width in pixels
    pub total_width: u32,
    /// Full document height in pixels
    pub total_height: u32,
}

impl ViewportData {
    /// Pixels of content scrolled past above the viewport
    pub fn pixels_above(&self) -> u32 {
        self.scroll_y
    }

    /// Pixels of content remaining below the viewport
    pub fn pixels_below(&self) -> u32 {
        self.total_height
            .saturating_sub(self.scroll_y + self.viewport_height)
    }
}

/// Page metadata captured with a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Viewport geometry
    pub viewport: ViewportData,
    /// Open tabs
    pub tabs: Vec<TabData>,
    /// Capture time
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// A processed page snapshot: metadata plus the immutable tree
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Page metadata at capture time
    pub metadata: SnapshotMetadata,
    /// The processed tree
    pub tree: DomTree,
}

/// Normalize a URL for comparison: scheme, `www.` prefix, query,
/// fragment and trailing slash are dropped.
pub fn clean_url(raw: &str) -> String {
    if let Ok(parsed) = Url::parse(raw) {
        if let Some(host) = parsed.host_str() {
            let host = host.strip_prefix("www.").unwrap_or(host);
            let path = parsed.path().trim_end_matches('/');
            return format!("{host}{path}");
        }
    }
    // not a parsable absolute URL, normalize textually
    let base = raw.split('?').next().unwrap_or(raw);
    base.trim_end_matches('/')
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .to_string()
}

impl Snapshot {
    /// Normalized page URL, for cross-snapshot comparison
    pub fn clean_url(&self) -> String {
        clean_url(&self.metadata.url)
    }

    /// Addressable nodes of the snapshot tree
    pub fn interaction_nodes(&self) -> Result<Vec<InteractionNode>> {
        self.tree.interaction_nodes()
    }

    /// Ids of the addressable nodes
    pub fn interaction_ids(&self) -> Vec<String> {
        self.tree.interaction_ids()
    }

    /// Whether this snapshot exposes the same interaction set as
    /// another. Logs the ids that appeared when the sets diverge.
    pub fn same_interactions_as(&self, other: &Snapshot) -> bool {
        let ours: HashSet<String> = self.interaction_ids().into_iter().collect();
        let theirs: HashSet<String> = other.interaction_ids().into_iter().collect();
        if ours == theirs {
            return true;
        }
        let appeared: Vec<&String> = theirs.difference(&ours).collect();
        warn!(url = self.metadata.url, ?appeared, "interaction set changed between snapshots");
        false
    }

    /// The subtree of not-yet-seen ids, or `None` when everything in
    /// this snapshot is already known
    pub fn new_content(&self, known_ids: &HashSet<String>) -> Option<DomTree> {
        diff_new_ids(&self.tree, known_ids)
    }
}
