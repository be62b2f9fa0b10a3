//! Runtime options.
//!
//! The host page passes a plain object to `init`; anything it leaves out
//! falls back to the defaults below, which match the class names and
//! timings the stock stylesheet ships with.

use serde::Deserialize;
use std::collections::HashMap;
use wasm_bindgen::JsValue;

/// Policy for a navigation that arrives while a swap is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavPolicy {
    /// Cancel the in-flight swap; the new navigation takes over.
    #[default]
    CancelPrevious,
    /// Park the new target until the in-flight swap settles. Latest wins.
    Queue,
}

/// Options accepted by `init`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionConfig {
    /// Marker class identifying the content region.
    pub content_class: String,
    /// Class of the full-viewport overlay shown during fetch latency.
    pub overlay_class: String,
    /// Selector for elements that get a preloaded background image.
    pub background_selector: String,
    /// Class applied to the temporary blurred background placeholder.
    pub placeholder_class: String,
    /// Selector for sections revealed on scroll.
    pub reveal_selector: String,
    /// Fraction of a reveal element that must be visible to trigger.
    pub reveal_threshold: f64,
    /// Root margin handed to the intersection observer.
    pub reveal_margin: String,
    /// Safety margin added to the computed transition length before the
    /// waiter gives up on `transitionend`.
    pub transition_grace_ms: f64,
    /// Fade time before a settled background placeholder is removed.
    pub placeholder_fade_ms: u32,
    /// What to do with a click while a swap is in flight.
    pub nav_policy: NavPolicy,
    /// Placeholder-link lookup table: normalized label -> route.
    pub routes: HashMap<String, String>,
    /// Ordered page flow driving the prev/next buttons. Empty disables them.
    pub flow: Vec<String>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            content_class: "screen".to_string(),
            overlay_class: "page-transition-overlay".to_string(),
            background_selector: ".cover-bg".to_string(),
            placeholder_class: "bg-placeholder".to_string(),
            reveal_selector: ".content-fade-in".to_string(),
            reveal_threshold: 0.2,
            reveal_margin: "50px".to_string(),
            transition_grace_ms: 80.0,
            placeholder_fade_ms: 500,
            nav_policy: NavPolicy::default(),
            routes: HashMap::new(),
            flow: Vec::new(),
        }
    }
}

impl TransitionConfig {
    /// Build a config from the JS options object. `undefined`/`null`
    /// mean "all defaults".
    pub fn from_js(options: JsValue) -> Result<Self, serde_wasm_bindgen::Error> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(options)
    }

    /// Selector form of the content marker class.
    pub fn content_selector(&self) -> String {
        format!(".{}", self.content_class)
    }
}
