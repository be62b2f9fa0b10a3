//! Content-region location.
//!
//! Every page, live or freshly parsed, must expose exactly one content
//! region. The fallback chain is the same everywhere: explicit marker
//! class, then a semantic main region, then the first top-level container.

use crate::config::TransitionConfig;
use web_sys::{Document, Element};

/// Locate the content region of a document.
pub fn content_region(document: &Document, config: &TransitionConfig) -> Option<Element> {
    let marker = config.content_selector();
    let chain = [marker.as_str(), "main", "div[role=\"main\"]", "body > div"];
    chain
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())
}

/// Locate the landing page's region and make sure it carries the marker
/// class, so later swaps and the exit animation can address it.
pub fn bootstrap_initial_region(
    document: &Document,
    config: &TransitionConfig,
) -> Option<Element> {
    let region = content_region(document, config)?;
    let classes = region.class_list();
    if !classes.contains(&config.content_class) {
        let _ = classes.add_1(&config.content_class);
    }
    Some(region)
}
