//! The page swapper.
//!
//! One navigation is one strictly ordered sequence: show overlay, play
//! the exit animation, fetch the target page, parse it in an inert
//! document, locate its content region, replace the live region, update
//! history, re-initialize backgrounds and reveals on the new region,
//! play the enter animation, hide the overlay.
//!
//! Overlapping navigations are governed by [`NavPolicy`]: under
//! cancel-previous each swap owns an epoch and anything stale steps
//! aside; under queue a single parked request runs after the active swap
//! settles.

use crate::config::{NavPolicy, TransitionConfig};
use crate::error::{describe_js, SwapError, SwapOutcome, SwapResult};
use crate::{backgrounds, locate, overlay::Overlay, reveal, waiter};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, Document, DomParser, Element, RequestInit, Response, SupportedType, Window,
};

const EXITING_CLASS: &str = "exiting";
const ACTIVE_CLASS: &str = "active";

/// History state payload for one navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub path: String,
}

/// One requested navigation.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub target_path: String,
    /// False when the browser already moved the history pointer
    /// (popstate); pushing again would corrupt the stack.
    pub push_history: bool,
}

/// How far a single swap attempt got.
enum Progress {
    Done,
    Stale,
}

enum Fetched {
    Body(String),
    Aborted,
}

/// Owns the current content region and runs swaps against it.
pub struct Swapper {
    window: Window,
    document: Document,
    overlay: Overlay,
    config: TransitionConfig,
    /// The single live content region. Written only here.
    current: RefCell<Option<Element>>,
    /// Monotonic navigation epoch; a swap holding a stale epoch yields.
    epoch: Cell<u64>,
    in_flight: Cell<bool>,
    /// Abort handle for the in-flight fetch (cancel-previous policy).
    abort: RefCell<Option<AbortController>>,
    /// One-slot queue (queue policy). Latest request wins the slot.
    queued: RefCell<Option<SwapRequest>>,
}

impl Swapper {
    pub fn new(
        window: Window,
        document: Document,
        overlay: Overlay,
        config: TransitionConfig,
        initial_region: Option<Element>,
    ) -> Self {
        Self {
            window,
            document,
            overlay,
            config,
            current: RefCell::new(initial_region),
            epoch: Cell::new(0),
            in_flight: Cell::new(false),
            abort: RefCell::new(None),
            queued: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Take the parked request, if any. The navigation layer drains this
    /// after each settled swap.
    pub fn take_queued(&self) -> Option<SwapRequest> {
        self.queued.borrow_mut().take()
    }

    /// Run one navigation to `request.target_path`.
    ///
    /// `Ok(Completed)` means the new region is live and active.
    /// `Ok(Superseded)` / `Ok(Queued)` mean another navigation owns the
    /// viewport; neither is a failure. Every `Err` leaves the document
    /// unchanged apart from overlay/exit classes, which are cleaned up
    /// here.
    pub async fn swap(&self, request: SwapRequest) -> SwapResult<SwapOutcome> {
        if self.in_flight.get() && self.config.nav_policy == NavPolicy::Queue {
            tracing::debug!(path = %request.target_path, "swap in flight, queueing");
            *self.queued.borrow_mut() = Some(request);
            return Ok(SwapOutcome::Queued);
        }

        let epoch = self.begin();
        tracing::debug!(path = %request.target_path, epoch, "starting swap");
        let progress = self.run(epoch, &request).await;

        // Cleanup belongs to whoever holds the newest epoch. A stale swap
        // must not hide the overlay the newer one just showed.
        let owning = self.epoch.get() == epoch;
        if owning {
            self.in_flight.set(false);
            self.abort.borrow_mut().take();
            self.overlay.hide();
        }

        match progress {
            Ok(Progress::Done) => Ok(SwapOutcome::Completed),
            Ok(Progress::Stale) => Ok(SwapOutcome::Superseded),
            Err(err) if owning => Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "superseded swap failed after cancellation");
                Ok(SwapOutcome::Superseded)
            }
        }
    }

    /// Claim a new epoch, cancelling whatever fetch is still in flight.
    fn begin(&self) -> u64 {
        if let Some(controller) = self.abort.borrow_mut().take() {
            controller.abort();
        }
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        self.in_flight.set(true);
        epoch
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.epoch.get() != epoch
    }

    async fn run(&self, epoch: u64, request: &SwapRequest) -> SwapResult<Progress> {
        self.overlay.show();

        // 1. Exit animation on the outgoing region.
        let exiting = self.current.borrow().clone();
        if let Some(region) = exiting {
            let _ = region.class_list().add_1(EXITING_CLASS);
            waiter::wait_for_transition_end(&self.window, &region, self.config.transition_grace_ms)
                .await;
            if self.is_stale(epoch) {
                return Ok(Progress::Stale);
            }
        }

        // 2. Fetch the target page.
        let html = match self.fetch_page(&request.target_path, epoch).await? {
            Fetched::Body(html) => html,
            Fetched::Aborted => return Ok(Progress::Stale),
        };
        if self.is_stale(epoch) {
            return Ok(Progress::Stale);
        }

        // 3. Parse in an inert document; scripts and styles of the
        // fetched page never execute.
        let parsed = DomParser::new()?
            .parse_from_string(&html, SupportedType::TextHtml)?;
        let incoming = locate::content_region(&parsed, &self.config)
            .ok_or(SwapError::MissingContentRegion)?;

        let title = parsed.title();
        if !title.is_empty() {
            self.document.set_title(&title);
        }

        // 4. Import into the live document and replace.
        let imported: Element = self
            .document
            .import_node_with_deep(&incoming, true)?
            .dyn_into()
            .map_err(|_| SwapError::Dom("imported region is not an element".into()))?;
        match self.current.borrow().as_ref() {
            Some(old) => old.replace_with_with_node_1(&imported)?,
            None => {
                self.document
                    .body()
                    .ok_or_else(|| SwapError::Dom("document has no body".into()))?
                    .append_child(&imported)?;
            }
        }
        *self.current.borrow_mut() = Some(imported.clone());

        // 5. History, unless the browser already moved the pointer.
        if request.push_history {
            self.push_history(&request.target_path)?;
        }

        // 6. Re-initialize dynamic content inside the new region.
        backgrounds::init_backgrounds(&imported, &self.document, &self.window, &self.config);
        reveal::init_reveal(&imported, &self.config);

        // 7. Enter animation on the next frame.
        waiter::next_frame().await;
        if self.is_stale(epoch) {
            return Ok(Progress::Stale);
        }
        let _ = imported.class_list().add_1(ACTIVE_CLASS);
        waiter::wait_for_transition_end(&self.window, &imported, self.config.transition_grace_ms)
            .await;

        tracing::info!(path = %request.target_path, "swap complete");
        Ok(Progress::Done)
    }

    async fn fetch_page(&self, path: &str, epoch: u64) -> SwapResult<Fetched> {
        let init = RequestInit::new();
        if let Ok(controller) = AbortController::new() {
            init.set_signal(Some(&controller.signal()));
            *self.abort.borrow_mut() = Some(controller);
        }

        let fetched = JsFuture::from(self.window.fetch_with_str_and_init(path, &init)).await;
        if self.epoch.get() == epoch {
            self.abort.borrow_mut().take();
        }

        let response: Response = match fetched {
            Ok(value) => value
                .dyn_into()
                .map_err(|_| SwapError::Dom("fetch did not yield a response".into()))?,
            Err(err) if is_abort(&err) => return Ok(Fetched::Aborted),
            Err(err) => return Err(SwapError::Network(describe_js(&err))),
        };
        if !response.ok() {
            return Err(SwapError::Http {
                status: response.status(),
            });
        }

        let body = JsFuture::from(response.text()?)
            .await
            .map_err(|err| SwapError::Network(describe_js(&err)))?;
        body.as_string()
            .map(Fetched::Body)
            .ok_or_else(|| SwapError::Dom("response body was not text".into()))
    }

    fn push_history(&self, path: &str) -> SwapResult<()> {
        let record = NavigationRecord {
            path: path.to_string(),
        };
        let state = serde_wasm_bindgen::to_value(&record)
            .map_err(|err| SwapError::Dom(err.to_string()))?;
        self.window
            .history()?
            .push_state_with_url(&state, "", Some(path))?;
        Ok(())
    }
}

fn is_abort(err: &JsValue) -> bool {
    err.dyn_ref::<web_sys::DomException>()
        .map_or(false, |exception| exception.name() == "AbortError")
}
