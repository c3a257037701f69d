use crate::framework::CssFramework;
use crate::runtime::{marker_styles, runtime_script};
use crate::sanitize::sanitize_html;
use atelier_editor::SourceBuffers;
use atelier_protocol::InteractionMode;
use std::fmt::Write;
use thiserror::Error;

/// Errors that can occur while composing a preview document
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Script contains a closing </script> tag on line {line}")]
    ScriptBreakout { line: usize },

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Options for document composition
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Framework stylesheet linked before the user CSS
    pub framework: CssFramework,
    /// Indentation string for the generated scaffolding
    pub indent: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            framework: CssFramework::Pure,
            indent: "  ".to_string(),
        }
    }
}

impl ComposeOptions {
    pub fn with_framework(framework: CssFramework) -> Self {
        Self {
            framework,
            ..Default::default()
        }
    }
}

struct Context<'a> {
    options: &'a ComposeOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a ComposeOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn add_line_fmt(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), ComposeError> {
        self.add_indent();
        self.buffer.write_fmt(args)?;
        self.buffer.push('\n');
        Ok(())
    }

    /// User text goes in verbatim so whitespace-sensitive content survives
    fn add_verbatim(&mut self, text: &str) {
        self.buffer.push_str(text);
        if !text.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compose the three buffers into one self-contained sandbox document
///
/// The output depends only on the arguments, so composing twice yields the
/// same bytes. Loading it always replaces the previous document wholesale.
pub fn compose(
    source: &SourceBuffers,
    mode: InteractionMode,
    options: &ComposeOptions,
) -> Result<String, ComposeError> {
    check_script(&source.javascript)?;

    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compose_head(source, &mut ctx);
    compose_body(source, mode, &mut ctx)?;

    ctx.dedent();
    ctx.add_line("</html>");

    let document = ctx.get_output();
    tracing::debug!(%mode, framework = %options.framework, bytes = document.len(), "composed preview document");
    Ok(document)
}

fn compose_head(source: &SourceBuffers, ctx: &mut Context<'_>) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");

    if let Some(link) = ctx.options.framework.link_tag() {
        ctx.add_line(&link);
    }

    ctx.add_line("<style>");
    ctx.add_verbatim(&source.css);
    ctx.add_line("</style>");

    ctx.add_line("<style>");
    ctx.add_verbatim(&marker_styles());
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compose_body(
    source: &SourceBuffers,
    mode: InteractionMode,
    ctx: &mut Context<'_>,
) -> Result<(), ComposeError> {
    ctx.add_line("<body>");
    ctx.indent();

    ctx.add_verbatim(&sanitize_html(&source.html));

    ctx.add_line("<script>");
    // A throwing user script must not stop the runtime below it
    ctx.add_line("try {");
    ctx.add_verbatim(&source.javascript);
    ctx.add_line("} catch (error) {");
    ctx.indent();
    ctx.add_line_fmt(format_args!("console.error({:?}, error);", "JavaScript error:"))?;
    ctx.dedent();
    ctx.add_line("}");
    ctx.add_verbatim(&runtime_script(mode));
    ctx.add_line("</script>");

    ctx.dedent();
    ctx.add_line("</body>");
    Ok(())
}

/// A literal `</script>` would end the embedded element early and leak the
/// rest of the script into the page as text
fn check_script(javascript: &str) -> Result<(), ComposeError> {
    for (index, line) in javascript.lines().enumerate() {
        if line.to_ascii_lowercase().contains("</script") {
            return Err(ComposeError::ScriptBreakout { line: index + 1 });
        }
    }
    Ok(())
}
