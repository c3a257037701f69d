//! # Atelier Composer
//!
//! Turns the html, css and js buffers plus the interaction mode into one
//! complete document for the sandbox.
//!
//! ```text
//! <!DOCTYPE html>
//! <html>
//!   <head>   meta, framework link, user CSS, marker rules
//!   <body>   sanitized user HTML
//!            <script> guarded user JS + runtime script </script>
//! ```
//!
//! ```rust
//! use atelier_composer::{compose, ComposeOptions};
//! use atelier_editor::SourceBuffers;
//! use atelier_protocol::InteractionMode;
//!
//! let source = SourceBuffers::new("<p>Hi</p>", "p { color: red; }", "");
//! let doc = compose(&source, InteractionMode::Selection, &ComposeOptions::default()).unwrap();
//! assert!(doc.contains("const interactionMode = \"selection\";"));
//! ```

mod compose;
mod framework;
mod runtime;
mod sanitize;

#[cfg(test)]
mod tests;

pub use compose::{compose, ComposeError, ComposeOptions};
pub use framework::CssFramework;
pub use runtime::{marker_styles, runtime_script, HIGHLIGHT_CLASS, SELECTED_CLASS};
pub use sanitize::sanitize_html;
