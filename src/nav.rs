//! Navigation interception.
//!
//! One delegated click listener on the document decides, per click,
//! whether the navigation is ours; a popstate listener replays history
//! moves through the same swap path. Both listeners live for the page
//! lifetime. When a swap fails the user is never stranded: the handler
//! logs and falls back to a full browser navigation.

use crate::error::SwapOutcome;
use crate::link::{self, LinkAction, RouteMap};
use crate::swap::{SwapRequest, Swapper};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MouseEvent, PopStateEvent, Window};

/// Attach the click and popstate listeners.
pub fn install(document: &Document, window: &Window, swapper: Rc<Swapper>) -> Result<(), JsValue> {
    let routes = RouteMap::new(swapper.config().routes.clone());

    let click_window = window.clone();
    let click_swapper = Rc::clone(&swapper);
    let on_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        let anchor = match clicked_anchor(&event) {
            Some(anchor) => anchor,
            None => return,
        };
        let mut href = anchor.get_attribute("href").unwrap_or_default();
        if href == "#" {
            // Placeholder link: map it to a real route or leave it alone.
            let explicit = anchor.get_attribute("data-route");
            match routes.resolve(explicit.as_deref(), &label_of(&anchor)) {
                Some(mapped) => href = mapped,
                None => return,
            }
        }

        let host = click_window.location().host().ok();
        match link::classify(&href, host.as_deref()) {
            LinkAction::Ignore | LinkAction::Native => {}
            LinkAction::Intercept(path) => {
                event.prevent_default();
                run_navigation(
                    Rc::clone(&click_swapper),
                    click_window.clone(),
                    SwapRequest {
                        target_path: path,
                        push_history: true,
                    },
                );
            }
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let pop_window = window.clone();
    let on_popstate = Closure::wrap(Box::new(move |_event: PopStateEvent| {
        // The browser already moved the pointer; re-fetch, don't re-push.
        let path = pop_window
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_string());
        run_navigation(
            Rc::clone(&swapper),
            pop_window.clone(),
            SwapRequest {
                target_path: path,
                push_history: false,
            },
        );
    }) as Box<dyn FnMut(PopStateEvent)>);
    window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
    on_popstate.forget();

    Ok(())
}

/// Nearest ancestor anchor of the click target, if any.
fn clicked_anchor(event: &MouseEvent) -> Option<Element> {
    let target = event.target()?;
    let element = target.dyn_ref::<Element>()?;
    element.closest("a[href]").ok().flatten()
}

/// Visible label of a link, for placeholder route lookup.
fn label_of(anchor: &Element) -> String {
    anchor
        .get_attribute("aria-label")
        .or_else(|| anchor.get_attribute("title"))
        .or_else(|| anchor.text_content())
        .unwrap_or_default()
}

/// Drive one navigation to completion, draining any queued follow-up,
/// and degrade to a full page load on failure.
fn run_navigation(swapper: Rc<Swapper>, window: Window, request: SwapRequest) {
    spawn_local(async move {
        let mut request = request;
        loop {
            let target = request.target_path.clone();
            let from_popstate = !request.push_history;
            match swapper.swap(request).await {
                Ok(SwapOutcome::Completed) | Ok(SwapOutcome::Superseded) => {
                    match swapper.take_queued() {
                        Some(next) => request = next,
                        None => break,
                    }
                }
                Ok(SwapOutcome::Queued) => break,
                Err(err) => {
                    tracing::error!(
                        path = %target,
                        error = %err,
                        "swap failed, falling back to full navigation"
                    );
                    fall_back(&window, &target, from_popstate);
                    break;
                }
            }
        }
    });
}

/// Full non-animated navigation; always correct, just less smooth.
fn fall_back(window: &Window, target: &str, from_popstate: bool) {
    let location = window.location();
    let result = if from_popstate {
        location.reload()
    } else {
        location.set_href(target)
    };
    if let Err(err) = result {
        tracing::error!(
            error = %crate::error::describe_js(&err),
            "fallback navigation failed"
        );
    }
}
