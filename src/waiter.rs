//! Transition waiting.
//!
//! A swap may not proceed past an exit or enter animation until the CSS
//! transition on the region has finished. The computed maximum of
//! `duration + delay` across all transitioned properties bounds the wait;
//! a timeout slightly past that bound covers `transitionend` never firing
//! (property not actually animating, tab backgrounded).

use futures::channel::oneshot;
use futures::future::select;
use futures::pin_mut;
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Element, Node, Window};

/// Parse a single CSS time value ("0.3s", "250ms") into milliseconds.
fn parse_time_ms(raw: &str) -> f64 {
    let value = raw.trim();
    if value.is_empty() {
        return 0.0;
    }
    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse().unwrap_or(0.0);
    }
    if let Some(secs) = value.strip_suffix('s') {
        return secs.trim().parse::<f64>().unwrap_or(0.0) * 1000.0;
    }
    value.parse().unwrap_or(0.0)
}

/// Longest `duration + delay` across the comma-separated per-property
/// lists of `transition-duration` and `transition-delay`.
///
/// A property without its own delay slot falls back to the first delay,
/// mirroring how the shorthand repeats.
pub fn longest_transition_ms(durations: &str, delays: &str) -> f64 {
    let delay_parts: Vec<&str> = delays.split(',').collect();
    durations
        .split(',')
        .enumerate()
        .map(|(i, duration)| {
            let delay = delay_parts
                .get(i)
                .or_else(|| delay_parts.first())
                .copied()
                .unwrap_or("0s");
            parse_time_ms(duration) + parse_time_ms(delay)
        })
        .fold(0.0, f64::max)
}

/// Resolve on the next animation frame.
pub async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                if window.request_animation_frame(&resolve).is_err() {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            }
            None => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Wait for the element's CSS transition to finish.
///
/// Resolves when a `transitionend` targeting this exact element arrives
/// (bubbled descendant transitions are ignored), or when the computed
/// maximum plus `grace_ms` elapses, whichever comes first. With no
/// transition configured it resolves on the next frame. Never fails: any
/// error along the way resolves immediately rather than blocking
/// navigation.
pub async fn wait_for_transition_end(window: &Window, element: &Element, grace_ms: f64) {
    let style = match window.get_computed_style(element) {
        Ok(Some(style)) => style,
        _ => return,
    };
    let durations = style
        .get_property_value("transition-duration")
        .unwrap_or_default();
    let delays = style
        .get_property_value("transition-delay")
        .unwrap_or_default();

    let max_ms = longest_transition_ms(&durations, &delays);
    if max_ms <= 0.0 {
        next_frame().await;
        return;
    }
    let timeout_ms = (max_ms.ceil() + grace_ms) as u32;

    let (ended_tx, ended_rx) = oneshot::channel::<()>();
    let mut ended_tx = Some(ended_tx);
    let target = element.clone();
    // Dropping the listener after the race removes the losing path.
    let _listener = EventListener::new(element, "transitionend", move |event| {
        let same_element = event
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .map_or(false, |node| target.is_same_node(Some(&node)));
        if !same_element {
            return;
        }
        if let Some(tx) = ended_tx.take() {
            let _ = tx.send(());
        }
    });

    let timeout = TimeoutFuture::new(timeout_ms);
    pin_mut!(ended_rx);
    pin_mut!(timeout);
    let _ = select(ended_rx, timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_and_millis() {
        assert_eq!(parse_time_ms("0.3s"), 300.0);
        assert_eq!(parse_time_ms("2s"), 2000.0);
        assert_eq!(parse_time_ms("250ms"), 250.0);
        assert_eq!(parse_time_ms(" 150ms "), 150.0);
    }

    #[test]
    fn test_parse_degenerate_values() {
        assert_eq!(parse_time_ms(""), 0.0);
        assert_eq!(parse_time_ms("0s"), 0.0);
        assert_eq!(parse_time_ms("garbage"), 0.0);
        // bare number, no unit
        assert_eq!(parse_time_ms("120"), 120.0);
    }

    #[test]
    fn test_longest_pairs_duration_with_delay() {
        // opacity 0.2s + 0.1s, transform 0.5s + 0s -> transform wins
        assert_eq!(longest_transition_ms("0.2s, 0.5s", "0.1s, 0s"), 500.0);
        // delay pushes the shorter property past the longer one
        assert_eq!(longest_transition_ms("0.2s, 0.5s", "1s, 0s"), 1200.0);
    }

    #[test]
    fn test_longest_missing_delay_falls_back_to_first() {
        // second property reuses the first delay slot
        assert_eq!(longest_transition_ms("0.1s, 0.2s", "0.3s"), 500.0);
    }

    #[test]
    fn test_longest_zero_when_unconfigured() {
        assert_eq!(longest_transition_ms("0s", "0s"), 0.0);
        assert_eq!(longest_transition_ms("", ""), 0.0);
    }
}
