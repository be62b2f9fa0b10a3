//! Pure link classification.
//!
//! Decides, from the raw `href` string alone, whether a click is ours to
//! intercept. Kept free of DOM types so the whole decision table is
//! testable off the browser.

use std::collections::HashMap;

/// What the click handler should do with a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Not a navigable link; do nothing either way.
    Ignore,
    /// Let the browser handle it (fragment, mail, tel, external origin).
    Native,
    /// Suppress the default and swap to this internal path.
    Intercept(String),
}

/// Classify a raw href against the current host.
///
/// `current_host` is `location.host` (host + optional port); when it is
/// unknown, absolute URLs are never intercepted.
pub fn classify(raw_href: &str, current_host: Option<&str>) -> LinkAction {
    let href = raw_href.trim();
    if href.is_empty() {
        return LinkAction::Ignore;
    }
    if href.starts_with('#') {
        // In-page fragment: the browser scrolls, we stay out of it.
        return LinkAction::Native;
    }
    if href.starts_with("//") {
        return LinkAction::Native;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return LinkAction::Native;
    }
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return match (split_absolute(href), current_host) {
            (Some((host, path)), Some(current)) if host.eq_ignore_ascii_case(current) => {
                LinkAction::Intercept(path.to_string())
            }
            _ => LinkAction::Native,
        };
    }
    if has_scheme(&lower) {
        // javascript:, data:, ftp: and friends are never ours.
        return LinkAction::Native;
    }

    LinkAction::Intercept(href.to_string())
}

/// Split an absolute http(s) URL into (host, path-and-rest).
fn split_absolute(href: &str) -> Option<(&str, &str)> {
    let rest = href.splitn(2, "://").nth(1)?;
    match rest.find('/') {
        Some(idx) => Some((&rest[..idx], &rest[idx..])),
        None => Some((rest, "/")),
    }
}

fn has_scheme(href: &str) -> bool {
    match href.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

// =============================================================================
// PLACEHOLDER ROUTE LOOKUP
// =============================================================================

/// Lookup table mapping placeholder links (`href="#"`) to real routes.
///
/// The table is site data supplied through the config; matching is by
/// normalized label, whole first, then by the label's first word.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: HashMap<String, String>,
}

impl RouteMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(label, route)| (normalize(&label), route))
            .collect();
        Self { entries }
    }

    /// Resolve a placeholder link to a route, if possible.
    ///
    /// An explicit `data-route` value wins outright; otherwise the link's
    /// visible label is looked up whole, then by first word.
    pub fn resolve(&self, explicit_route: Option<&str>, label: &str) -> Option<String> {
        if let Some(route) = explicit_route {
            if !route.is_empty() {
                return Some(route.to_string());
            }
        }
        let label = normalize(label);
        if label.is_empty() {
            return None;
        }
        if let Some(route) = self.entries.get(&label) {
            return Some(route.clone());
        }
        let first = label
            .split(|c: char| c.is_whitespace() || c == '-')
            .next()?;
        self.entries.get(first).cloned()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HOST: Option<&str> = Some("example.com");

    #[test]
    fn test_relative_paths_are_intercepted() {
        assert_eq!(
            classify("about.html", HOST),
            LinkAction::Intercept("about.html".into())
        );
        assert_eq!(
            classify("/docs/intro.html", HOST),
            LinkAction::Intercept("/docs/intro.html".into())
        );
        // spaces in static-site filenames survive intact
        assert_eq!(
            classify("welcome home screen.html", HOST),
            LinkAction::Intercept("welcome home screen.html".into())
        );
    }

    #[test]
    fn test_fragment_mail_and_tel_stay_native() {
        assert_eq!(classify("#section-2", HOST), LinkAction::Native);
        assert_eq!(classify("mailto:hi@example.com", HOST), LinkAction::Native);
        assert_eq!(classify("tel:+15551234", HOST), LinkAction::Native);
        assert_eq!(classify("MAILTO:HI@EXAMPLE.COM", HOST), LinkAction::Native);
    }

    #[test]
    fn test_external_origins_stay_native() {
        assert_eq!(classify("https://other.org/x", HOST), LinkAction::Native);
        assert_eq!(classify("http://other.org", HOST), LinkAction::Native);
        assert_eq!(classify("//cdn.example.net/lib.js", HOST), LinkAction::Native);
        assert_eq!(classify("javascript:void(0)", HOST), LinkAction::Native);
    }

    #[test]
    fn test_same_host_absolute_is_internal() {
        assert_eq!(
            classify("https://example.com/about.html", HOST),
            LinkAction::Intercept("/about.html".into())
        );
        assert_eq!(
            classify("https://EXAMPLE.com", HOST),
            LinkAction::Intercept("/".into())
        );
        // port is part of the host comparison
        assert_eq!(
            classify("https://example.com:8080/x", HOST),
            LinkAction::Native
        );
    }

    #[test]
    fn test_unknown_host_never_intercepts_absolute() {
        assert_eq!(
            classify("https://example.com/about.html", None),
            LinkAction::Native
        );
        assert_eq!(
            classify("about.html", None),
            LinkAction::Intercept("about.html".into())
        );
    }

    #[test]
    fn test_empty_href_is_ignored() {
        assert_eq!(classify("", HOST), LinkAction::Ignore);
        assert_eq!(classify("   ", HOST), LinkAction::Ignore);
    }

    #[test]
    fn test_colon_past_first_segment_is_not_a_scheme() {
        assert_eq!(
            classify("page.html?time=1:30", HOST),
            LinkAction::Intercept("page.html?time=1:30".into())
        );
    }

    fn sample_routes() -> RouteMap {
        RouteMap::new(HashMap::from([
            ("map".to_string(), "map dashboard.html".to_string()),
            ("settings".to_string(), "settings.html".to_string()),
            ("start now".to_string(), "map dashboard.html".to_string()),
        ]))
    }

    #[test]
    fn test_route_map_explicit_wins() {
        let routes = sample_routes();
        assert_eq!(
            routes.resolve(Some("custom.html"), "Settings"),
            Some("custom.html".into())
        );
    }

    #[test]
    fn test_route_map_label_lookup() {
        let routes = sample_routes();
        assert_eq!(
            routes.resolve(None, "  Start Now "),
            Some("map dashboard.html".into())
        );
        assert_eq!(routes.resolve(None, "Settings"), Some("settings.html".into()));
    }

    #[test]
    fn test_route_map_first_word_fallback() {
        let routes = sample_routes();
        assert_eq!(
            routes.resolve(None, "Map overview"),
            Some("map dashboard.html".into())
        );
        assert_eq!(routes.resolve(None, "unknown label"), None);
        assert_eq!(routes.resolve(None, ""), None);
    }
}
