//! # Atelier Styles
//!
//! Best-effort answer to "which declarations in the project CSS apply to
//! this element?".
//!
//! This is deliberately not a CSS engine. Rules are found by text scanning,
//! selectors are matched one simple selector at a time, and there is no
//! specificity. Callers go through [`StyleMatcher`] so the textual
//! implementation can be swapped for a real tokenizer without touching the
//! protocol or selection code.
//!
//! ```rust
//! use atelier_protocol::SelectedElement;
//! use atelier_styles::{StyleMatcher, TextualMatcher};
//!
//! let mut element = SelectedElement { tag: "a".into(), ..Default::default() };
//! element.properties.insert("class".into(), "btn primary".into());
//!
//! let styles = TextualMatcher.matched_styles(".btn { color: red; }", &element);
//! assert_eq!(styles.get("color").map(String::as_str), Some("red"));
//! ```

mod declarations;
mod matcher;
mod selector;
mod stylesheet;

pub use declarations::parse_declarations;
pub use matcher::{inline_styles, AppliedStyles, StyleMatcher, TextualMatcher};
pub use selector::Selector;
pub use stylesheet::{ParsedCssRule, StyleSheet};
