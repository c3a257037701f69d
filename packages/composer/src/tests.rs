use crate::{compose, ComposeError, ComposeOptions, CssFramework};
use atelier_editor::SourceBuffers;
use atelier_protocol::InteractionMode;

fn sample() -> SourceBuffers {
    SourceBuffers::new(
        "<div class=\"container\">\n  <h1>Hello</h1>\n</div>",
        "h1 { color: #333; }",
        "document.querySelector('h1').textContent = 'Hi';",
    )
}

#[test]
fn test_compose_layout() {
    let doc = compose(&sample(), InteractionMode::Selection, &ComposeOptions::default())
        .expect("Failed to compose");

    println!("Composed document:\n{}", doc);

    assert!(doc.starts_with("<!DOCTYPE html>\n<html>\n  <head>\n"));
    assert!(doc.contains("<style>\nh1 { color: #333; }\n"));
    assert!(doc.contains(".element-highlight"));
    assert!(doc.contains(".element-selected"));
    assert!(doc.contains("<div class=\"container\">\n  <h1>Hello</h1>\n</div>\n"));
    assert!(doc.ends_with("  </body>\n</html>\n"));

    let head_end = doc.find("</head>").unwrap();
    let body_start = doc.find("<body>").unwrap();
    assert!(head_end < body_start);
}

#[test]
fn test_user_script_is_guarded_before_runtime() {
    let doc = compose(&sample(), InteractionMode::Selection, &ComposeOptions::default()).unwrap();

    let guard = doc.find("try {").unwrap();
    let user = doc.find("textContent = 'Hi'").unwrap();
    let catch = doc.find("} catch (error) {").unwrap();
    let runtime = doc.find("const interactionMode").unwrap();

    assert!(guard < user && user < catch && catch < runtime);
    assert!(doc.contains("console.error(\"JavaScript error:\", error);"));
}

#[test]
fn test_compose_is_deterministic() {
    let options = ComposeOptions::with_framework(CssFramework::Tailwind);
    let first = compose(&sample(), InteractionMode::Interaction, &options).unwrap();
    let second = compose(&sample(), InteractionMode::Interaction, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_mode_changes_document() {
    let options = ComposeOptions::default();
    let selection = compose(&sample(), InteractionMode::Selection, &options).unwrap();
    let interaction = compose(&sample(), InteractionMode::Interaction, &options).unwrap();

    assert_ne!(selection, interaction);
    assert!(interaction.contains("const interactionMode = \"interaction\";"));
}

#[test]
fn test_framework_link_precedes_user_css() {
    let doc = compose(
        &sample(),
        InteractionMode::Selection,
        &ComposeOptions::with_framework(CssFramework::Bootstrap),
    )
    .unwrap();

    let link = doc.find("bootstrap@5.3.0").unwrap();
    let css = doc.find("h1 { color: #333; }").unwrap();
    assert!(link < css);

    let pure = compose(&sample(), InteractionMode::Selection, &ComposeOptions::default()).unwrap();
    assert!(!pure.contains("<link"));
}

#[test]
fn test_external_scripts_are_stripped() {
    let source = SourceBuffers::new(
        "<p>a</p><script src=\"https://cdn.test/lib.js\"></script>",
        "",
        "",
    );
    let doc = compose(&source, InteractionMode::Selection, &ComposeOptions::default()).unwrap();
    assert!(!doc.contains("cdn.test"));
    assert!(doc.contains("<p>a</p>"));
}

#[test]
fn test_malformed_html_is_passed_through() {
    let source = SourceBuffers::new("<div><span>unclosed", "", "");
    let doc = compose(&source, InteractionMode::Selection, &ComposeOptions::default()).unwrap();
    assert!(doc.contains("<div><span>unclosed\n"));
}

#[test]
fn test_script_close_tag_fails_composition() {
    let source = SourceBuffers::new("", "", "const a = 1;\ndocument.write('</SCRIPT>');");
    let result = compose(&source, InteractionMode::Selection, &ComposeOptions::default());
    assert!(matches!(result, Err(ComposeError::ScriptBreakout { line: 2 })));
}
