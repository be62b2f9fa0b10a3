//! Scroll-into-view content reveal.
//!
//! Flagged sections start hidden by the stylesheet and get an `active`
//! class the first time they intersect the viewport. The trigger is
//! one-shot: once revealed, the observer is dropped and the class never
//! comes off.

use crate::config::TransitionConfig;
use crate::error::describe_js;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

const INITIALIZED_FLAG: &str = "revealInitialized";
const ACTIVE_CLASS: &str = "active";

/// Register reveal observers for every flagged, uninitialized element
/// inside `scope`.
pub fn init_reveal(scope: &Element, config: &TransitionConfig) {
    let nodes = match scope.query_selector_all(&config.reveal_selector) {
        Ok(nodes) => nodes,
        Err(err) => {
            tracing::warn!(
                selector = %config.reveal_selector,
                error = %describe_js(&err),
                "reveal selector query failed"
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
        if let Err(err) = observe(&element, config) {
            tracing::warn!(error = %describe_js(&err), "reveal observer setup failed");
            continue;
        }
        // Flag at registration time so a second pass never doubles the
        // observer.
        let _ = element.dataset().set(INITIALIZED_FLAG, "true");
    }
}

fn observe(element: &HtmlElement, config: &TransitionConfig) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    let _ = entry.target().class_list().add_1(ACTIVE_CLASS);
                    observer.disconnect();
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_margin);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(element);
    // The observer owns the element's reveal from here; the closure lives
    // as long as the page.
    callback.forget();
    Ok(())
}
