//! Pre-embedding cleanup of user HTML
//!
//! Only external scripts are removed. Everything else is passed through
//! untouched; the sandbox's own parser deals with malformed markup.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn external_script() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<script[^>]+src[^>]+>.*?</script>")
            .expect("external script pattern is a valid regex")
    })
}

/// Strip `<script src=...>` elements
///
/// Matching is single-line, so a script element spanning lines is kept.
pub fn sanitize_html(html: &str) -> Cow<'_, str> {
    let cleaned = external_script().replace_all(html, "");
    if let Cow::Owned(_) = cleaned {
        tracing::debug!("removed external script elements");
    }
    cleaned
}
