//! Slipstream — page-transition runtime for static multi-page sites.
//!
//! Intercepts in-site link clicks, fetches the target page over plain
//! HTTP GET, swaps its content region into the live document with
//! exit/enter animations, and keeps browser history consistent, all
//! without a full page reload. Pages opt in through markup alone: a
//! marker class on the content region, `data-bg` for preloaded
//! backgrounds, a fade-in class for scroll reveals.
//!
//! Wiring:
//! ```text
//! click / popstate ──► nav ──► swap ──► waiter (exit)
//!                                 │──► fetch + parse + replace
//!                                 │──► backgrounds / reveal re-init
//!                                 └──► waiter (enter)
//! ```

pub mod backgrounds;
pub mod config;
pub mod error;
pub mod flow;
pub mod link;
pub mod locate;
pub mod nav;
pub mod overlay;
pub mod reveal;
pub mod swap;
pub mod waiter;

pub use config::{NavPolicy, TransitionConfig};
pub use error::{SwapError, SwapOutcome};
pub use swap::{SwapRequest, Swapper};

use overlay::Overlay;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static INSTALLED: RefCell<bool> = RefCell::new(false);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    web_sys::console::log_1(&"=== SLIPSTREAM LOADED ===".into());
}

/// Wire the runtime into the current document.
///
/// `options` is a plain object (or `undefined` for defaults), see
/// [`TransitionConfig`]. Calling twice is a logged no-op; a site that
/// includes the bundle twice must not end up with doubled listeners.
#[wasm_bindgen]
pub fn init(options: JsValue) -> Result<(), JsValue> {
    let already = INSTALLED.with(|installed| *installed.borrow());
    if already {
        tracing::warn!("already initialized, ignoring second init");
        return Ok(());
    }

    let config =
        TransitionConfig::from_js(options).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // The landing page's region doubles as the first exit target.
    let region = locate::bootstrap_initial_region(&document, &config);
    if region.is_none() {
        tracing::warn!(selector = %config.content_selector(), "no initial content region");
    }

    let overlay = Overlay::ensure(&document, &config.overlay_class).map_err(JsValue::from)?;
    let swapper = Rc::new(Swapper::new(
        window.clone(),
        document.clone(),
        overlay,
        config.clone(),
        region.clone(),
    ));
    nav::install(&document, &window, Rc::clone(&swapper))?;

    if let Some(body) = document.body() {
        backgrounds::init_backgrounds(&body, &document, &window, &config);
        reveal::init_reveal(&body, &config);
    }
    if let Err(err) = flow::inject_flow_buttons(&document, &window, &config) {
        tracing::warn!(error = %err, "flow button injection failed");
    }

    // Enter styling for the landing page, one frame after everything is
    // in place so other scripts and styles settle first.
    if let Some(region) = region {
        wasm_bindgen_futures::spawn_local(async move {
            waiter::next_frame().await;
            let _ = region.class_list().add_1("active");
        });
    }

    INSTALLED.with(|installed| *installed.borrow_mut() = true);
    tracing::info!(policy = ?config.nav_policy, "initialized");
    Ok(())
}
