//! Flow navigation buttons.
//!
//! Sites that read as a linear sequence can declare that order in the
//! config; pages on the flow get fixed prev/next buttons. The buttons
//! are plain anchors, so the click interceptor treats them like any
//! other internal link.

use crate::config::TransitionConfig;
use crate::error::SwapResult;
use web_sys::{Document, Element, Window};

const CONTAINER_CLASS: &str = "flow-nav";
const BUTTON_CLASS: &str = "flow-nav-btn";

/// Last path segment of a pathname, still percent-encoded.
fn last_segment(pathname: &str) -> &str {
    pathname.rsplit('/').next().unwrap_or(pathname)
}

/// Neighbors of `current` in the flow. `None` when the page is not part
/// of the flow at all.
fn flow_neighbors<'a>(
    flow: &'a [String],
    current: &str,
) -> Option<(Option<&'a str>, Option<&'a str>)> {
    let index = flow.iter().position(|page| page == current)?;
    let prev = index.checked_sub(1).map(|i| flow[i].as_str());
    let next = flow.get(index + 1).map(String::as_str);
    Some((prev, next))
}

/// Inject the prev/next buttons for the current page, if it is on the
/// configured flow. Safe to call on a page that already has them.
pub fn inject_flow_buttons(
    document: &Document,
    window: &Window,
    config: &TransitionConfig,
) -> SwapResult<()> {
    if config.flow.is_empty() {
        return Ok(());
    }
    if document
        .query_selector(&format!(".{CONTAINER_CLASS}"))?
        .is_some()
    {
        return Ok(());
    }

    let pathname = window.location().pathname().unwrap_or_default();
    let segment = last_segment(&pathname);
    let current = js_sys::decode_uri_component(segment)
        .map(String::from)
        .unwrap_or_else(|_| segment.to_string());

    let (prev, next) = match flow_neighbors(&config.flow, &current) {
        Some(neighbors) => neighbors,
        None => return Ok(()),
    };

    let container = document.create_element("div")?;
    container.set_class_name(CONTAINER_CLASS);
    container.set_attribute("aria-hidden", "false")?;

    if let Some(prev) = prev {
        container.append_child(&make_button(document, "\u{2190}", prev, "Previous")?.into())?;
    }
    if let Some(next) = next {
        container.append_child(&make_button(document, "\u{2192}", next, "Next")?.into())?;
    }

    document
        .body()
        .ok_or_else(|| crate::error::SwapError::Dom("document has no body".into()))?
        .append_child(&container)?;
    Ok(())
}

fn make_button(document: &Document, label: &str, href: &str, title: &str) -> SwapResult<Element> {
    let anchor = document.create_element("a")?;
    anchor.set_class_name(BUTTON_CLASS);
    anchor.set_attribute("href", href)?;
    anchor.set_attribute("title", title)?;
    anchor.set_attribute("aria-label", title)?;
    anchor.set_text_content(Some(label));
    Ok(anchor)
}
