//! Background image loading.
//!
//! Flagged elements get their full-resolution background preloaded while
//! a placeholder carrying the same image (blurred by the stylesheet)
//! covers them. Initialization is idempotent per element via a dataset
//! flag, so re-running after a swap only touches the new region.

use crate::config::TransitionConfig;
use crate::error::describe_js;
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, Window};

const INITIALIZED_FLAG: &str = "bgInitialized";
const SOURCE_ATTR: &str = "bg";

/// Initialize every flagged element inside `scope` that has not been
/// initialized yet.
pub fn init_backgrounds(
    scope: &Element,
    document: &Document,
    window: &Window,
    config: &TransitionConfig,
) {
    let nodes = match scope.query_selector_all(&config.background_selector) {
        Ok(nodes) => nodes,
        Err(err) => {
            tracing::warn!(
                selector = %config.background_selector,
                error = %describe_js(&err),
                "background selector query failed"
            );
            return;
        }
    };

    for index in 0..nodes.length() {
        let element: HtmlElement = match nodes.get(index).and_then(|n| n.dyn_into().ok()) {
            Some(element) => element,
            None => continue,
        };
        if element.dataset().get(INITIALIZED_FLAG).is_some() {
            continue;
        }
        init_one(&element, document, window, config);
        // Flagged unconditionally, even without a usable URL, so the
        // element is never reprocessed.
        let _ = element.dataset().set(INITIALIZED_FLAG, "true");
    }
}

fn init_one(
    element: &HtmlElement,
    document: &Document,
    window: &Window,
    config: &TransitionConfig,
) {
    let url = match background_url(element, window) {
        Some(url) => url,
        None => return,
    };

    let placeholder: HtmlElement = match document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into().ok())
    {
        Some(placeholder) => placeholder,
        None => return,
    };
    placeholder.set_class_name(&config.placeholder_class);
    let _ = placeholder
        .style()
        .set_property("background-image", &format!("url(\"{url}\")"));
    if element
        .insert_before(&placeholder, element.first_child().as_ref())
        .is_err()
    {
        return;
    }

    let fade_ms = config.placeholder_fade_ms;
    spawn_local(async move {
        preload_image(&url).await;
        let _ = placeholder.style().set_property("opacity", "0");
        Timeout::new(fade_ms, move || {
            placeholder.remove();
        })
        .forget();
    });
}

/// Image URL for an element: the explicit source attribute wins and is
/// applied inline so later computed-style reads agree; otherwise reuse a
/// background the stylesheet already assigned.
fn background_url(element: &HtmlElement, window: &Window) -> Option<String> {
    if let Some(url) = element.dataset().get(SOURCE_ATTR) {
        let _ = element
            .style()
            .set_property("background-image", &format!("url(\"{url}\")"));
        return Some(url);
    }
    let computed = window
        .get_computed_style(element)
        .ok()
        .flatten()?
        .get_property_value("background-image")
        .ok()?;
    extract_css_url(&computed)
}

/// Pull the bare URL out of a CSS `url("...")` value.
pub(crate) fn extract_css_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return None;
    }
    let inner = value.strip_prefix("url(")?.strip_suffix(')')?;
    let inner = inner.trim().trim_matches(|c| c == '"' || c == '\'');
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Preload an image, resolving on load or error uniformly.
///
/// Folding the error case in is deliberate: a broken image must settle
/// the placeholder instead of stranding it over the content forever.
pub async fn preload_image(url: &str) {
    let url = url.to_string();
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(_) => {
                let _ = resolve.call0(&JsValue::NULL);
                return;
            }
        };
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&resolve));
        image.set_src(&url);
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_url() {
        assert_eq!(
            extract_css_url("url(\"cover.jpg\")"),
            Some("cover.jpg".to_string())
        );
        assert_eq!(
            extract_css_url("url('img/hero.png')"),
            Some("img/hero.png".to_string())
        );
        assert_eq!(
            extract_css_url("url(unquoted.webp)"),
            Some("unquoted.webp".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_none_and_empty() {
        assert_eq!(extract_css_url("none"), None);
        assert_eq!(extract_css_url(""), None);
        assert_eq!(extract_css_url("url()"), None);
        assert_eq!(extract_css_url("url(\"\")"), None);
    }

    #[test]
    fn test_extract_rejects_non_url_values() {
        assert_eq!(extract_css_url("linear-gradient(red, blue)"), None);
    }
}
