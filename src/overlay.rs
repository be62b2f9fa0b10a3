//! Transition overlay.
//!
//! A full-viewport element masks the content discontinuity between the
//! exit animation and the enter animation. The swapper shows it first
//! thing and is responsible for hiding it again no matter how the swap
//! ends.

use crate::error::SwapResult;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

const VISIBLE_CLASS: &str = "visible";

/// Handle to the overlay element.
#[derive(Debug, Clone)]
pub struct Overlay {
    element: Element,
}

impl Overlay {
    /// Reuse an overlay already present in the page, or create one and
    /// append it to the body.
    pub fn ensure(document: &Document, overlay_class: &str) -> SwapResult<Self> {
        if let Some(existing) = document.query_selector(&format!(".{overlay_class}"))? {
            return Ok(Self { element: existing });
        }

        let element = document.create_element("div")?;
        element.set_class_name(overlay_class);
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            // Safari only honors the prefixed backdrop-filter.
            let _ = html
                .style()
                .set_property("-webkit-backdrop-filter", "blur(var(--blur-strength))");
        }
        document
            .body()
            .ok_or_else(|| crate::error::SwapError::Dom("document has no body".into()))?
            .append_child(&element)?;
        Ok(Self { element })
    }

    pub fn show(&self) {
        let _ = self.element.class_list().add_1(VISIBLE_CLASS);
    }

    pub fn hide(&self) {
        let _ = self.element.class_list().remove_1(VISIBLE_CLASS);
    }

    pub fn is_visible(&self) -> bool {
        self.element.class_list().contains(VISIBLE_CLASS)
    }
}
