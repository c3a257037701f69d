//! # HTML Insertion
//!
//! Decides where, textually, new markup lands in the HTML buffer.
//!
//! The default strategy is pure text splicing with no structural
//! awareness. Known limitations, kept on purpose:
//! - the last `</div>` may belong to an unrelated nested `<div>`
//! - self-closing tags are not special-cased
//! - unbalanced markup is spliced as-is
//!
//! A structural editor can replace it by implementing [`InsertionStrategy`].

use regex::Regex;
use std::sync::OnceLock;

/// Where to put inserted markup
pub trait InsertionStrategy: Send + Sync {
    /// Return the new HTML buffer
    fn insert(&self, html: &str, markup: &str) -> String;

    /// Get a debug name for this strategy
    fn name(&self) -> &'static str;
}

/// Before the last `</div>`, else appended on a new line
#[derive(Debug, Clone, Copy, Default)]
pub struct LastDivInsertion;

fn closing_div() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)</div>").expect("closing div pattern is a valid regex"))
}

impl InsertionStrategy for LastDivInsertion {
    fn insert(&self, html: &str, markup: &str) -> String {
        // Presence checks are case-sensitive, the anchor match is not
        if html.contains("<div") && html.contains("</div>") {
            if let Some(last) = closing_div().find_iter(html).last() {
                let mut updated = String::with_capacity(html.len() + markup.len() + 3);
                updated.push_str(&html[..last.start()]);
                updated.push_str("  ");
                updated.push_str(markup);
                updated.push('\n');
                updated.push_str(&html[last.start()..]);
                return updated;
            }
        }

        format!("{html}\n{markup}")
    }

    fn name(&self) -> &'static str {
        "last-div"
    }
}
