//! Selector resolution and the locate contract
//!
//! Resolution turns a node's precomputed [`Selectors`] into the form a
//! locator backend can consume, rewriting them into shadow-piercing
//! chains when the node sits behind a shadow root. The backend itself
//! stays behind the [`FrameContext`] seam so the engine never depends on
//! a concrete browser driver.

mod shadow;

use crate::dom::node::{DomTree, NodeId, Selectors};
use crate::error::{InvariantError, LocatorError, Result};
use std::future::Future;
use tracing::{debug, warn};

/// One frame of a live page, as seen by the locate contract.
///
/// Implementors wrap a browser driver's page/frame handle. Descending
/// into an iframe yields another `FrameContext`; matching a selector
/// yields an opaque element handle.
pub trait FrameContext: Sized {
    /// Handle to the elements matched by a selector within this frame
    type Handle;

    /// Descend into the iframe matched by `css`
    fn frame_by_css(&self, css: &str) -> Self;

    /// Handle for the given `css=`/`xpath=` selector
    fn select(&self, selector: &str) -> Self::Handle;

    /// Number of elements the selector currently matches.
    ///
    /// Driver failures (detached frames, closed pages) surface as
    /// [`crate::error::LocatorError::Backend`].
    fn count(&self, selector: &str) -> impl Future<Output = Result<usize>>;
}

/// Compute the selectors to hand to a locator backend for one node.
///
/// Fails with an invariant violation when the node has no precomputed
/// selectors; rewrites them through the shadow chain when the node is
/// inside a shadow root.
pub fn resolve_selectors(tree: &DomTree, id: NodeId) -> Result<Selectors> {
    let node = tree.node(id);
    let Some(selectors) = &node.computed.selectors else {
        return Err(InvariantError::MissingSelectors {
            id: node
                .id
                .clone()
                .unwrap_or_else(|| node.role_str().to_string()),
        }
        .into());
    };
    if selectors.in_shadow_root {
        debug!(id = ?node.id, "resolving shadow root selectors");
        return shadow::selectors_through_shadow_dom(tree, id);
    }
    Ok(selectors.clone())
}

/// Descend from the page into the frame holding the node.
///
/// Errors when the selectors do not place the node inside an iframe.
pub fn frame_for<F: FrameContext>(page: &F, selectors: &Selectors) -> Result<F> {
    if !selectors.in_iframe || selectors.iframe_parent_css_selectors.is_empty() {
        return Err(LocatorError::NotInIframe.into());
    }
    let mut css_paths = selectors.iframe_parent_css_selectors.iter();
    let first = css_paths.next().map(|css| page.frame_by_css(css));
    let Some(mut frame) = first else {
        return Err(LocatorError::NotInIframe.into());
    };
    for css in css_paths {
        frame = frame.frame_by_css(css);
    }
    Ok(frame)
}

/// Locate an element on a live page.
///
/// Descends into the node's frame when needed, then tries the `css=`
/// and `xpath=` strategies in order. Exactly one match wins; zero falls
/// through to the next strategy; more than one logs a warning and wins
/// anyway (the first match is almost always the intended element, and
/// failing hard would strand otherwise-resolvable actions).
pub async fn locate_element<F: FrameContext>(
    page: &F,
    selectors: &Selectors,
) -> Result<F::Handle> {
    let frame;
    let target: &F = if selectors.in_iframe {
        frame = frame_for(page, selectors)?;
        &frame
    } else {
        page
    };

    for strategy in [
        format!("css={}", selectors.css_selector),
        format!("xpath={}", selectors.xpath_selector),
    ] {
        let count = target.count(&strategy).await?;
        if count > 1 {
            warn!(selector = strategy, count, "selector is ambiguous, taking the first match");
            return Ok(target.select(&strategy));
        }
        if count == 1 {
            return Ok(target.select(&strategy));
        }
    }
    Err(LocatorError::NoMatch {
        css: selectors.css_selector.clone(),
        xpath: selectors.xpath_selector.clone(),
    }
    .into())
}
