//! Preview host driving the native sandbox over a real link

use atelier_composer::{ComposeOptions, CssFramework};
use atelier_editor::{
    EditSession, EditorError, SelectionPatch, SourceBuffers, SourceDocument, SourceEdit,
    SourceKind,
};
use atelier_protocol::{link, EditorCodeUpdate, ElementUpdate, InteractionMode, MessagePoster};
use atelier_sandbox::{spawn_sandbox, SandboxHandle, Target};
use atelier_workspace::{spawn_relay, HostError, HostHandle, PreviewEvent, PreviewHost, PreviewStatus};
use std::time::Duration;

const HTML: &str = r#"<div class="container">
  <h1 id="title">Hello</h1>
  <button id="go" class="btn primary" onclick="start()">Go</button>
</div>"#;
const CSS: &str = ".btn { color: red; }\n.btn.primary { color: blue; }";
const JS: &str = "function start() { document.getElementById('go').disabled = true; }";

struct Harness {
    host: HostHandle,
    sandbox: SandboxHandle,
    poster: MessagePoster,
}

impl Harness {
    /// Spawn both sides and wait until the first document is in the frame
    async fn start(document: SourceDocument) -> Self {
        let (host_link, frame_link) = link();
        let poster = frame_link.poster();
        let (sandbox, _sandbox_task) = spawn_sandbox(frame_link);
        let (host, _host_task) =
            PreviewHost::new(EditSession::new(document), host_link, ComposeOptions::default())
                .spawn();
        let harness = Self {
            host,
            sandbox,
            poster,
        };
        harness.settle().await;
        harness
    }

    async fn in_memory() -> Self {
        Self::start(SourceDocument::from_buffers(SourceBuffers::new(HTML, CSS, JS))).await
    }

    /// Let the sandbox drain its queue, then let the host read what it posted
    async fn settle(&self) {
        self.sandbox.snapshot().await.unwrap();
        self.host.snapshot().await.unwrap();
    }
}

#[tokio::test]
async fn test_initial_load_reaches_sandbox() {
    let h = Harness::in_memory().await;

    let host = h.host.snapshot().await.unwrap();
    assert_eq!(host.loads, 1);
    assert!(matches!(host.status, PreviewStatus::Loaded { version: 0, .. }));

    let sandbox = h.sandbox.snapshot().await.unwrap();
    assert_eq!(sandbox.loads, 1);
    assert_eq!(sandbox.mode, Some(InteractionMode::Selection));
    assert!(sandbox.body_html.contains("<h1 id=\"title\">Hello</h1>"));
}

#[tokio::test]
async fn test_click_right_after_spawn_is_kept() {
    let (host_link, frame_link) = link();
    let (sandbox, _sandbox_task) = spawn_sandbox(frame_link);
    let (host, _host_task) = PreviewHost::new(
        EditSession::new(SourceDocument::from_buffers(SourceBuffers::new(HTML, CSS, JS))),
        host_link,
        ComposeOptions::default(),
    )
    .spawn();

    // No settling: the click is queued behind the first load, never ahead of it
    sandbox.click(Target::id("title")).unwrap();
    sandbox.snapshot().await.unwrap();

    let selection = host.snapshot().await.unwrap().selection.unwrap();
    assert_eq!(selection.tag, "h1");
}

#[tokio::test]
async fn test_select_then_body_click_clears_host_selection() {
    let h = Harness::in_memory().await;

    h.sandbox.click(Target::id("title")).unwrap();
    h.settle().await;

    let selection = h.host.snapshot().await.unwrap().selection.unwrap();
    assert_eq!(selection.tag, "h1");
    assert_eq!(selection.content, "Hello");
    assert_eq!(selection.properties["class"], "element-selected");

    h.sandbox.click(Target::Body).unwrap();
    h.settle().await;

    assert_eq!(h.host.snapshot().await.unwrap().selection, None);
    assert_eq!(h.sandbox.snapshot().await.unwrap().selected_markers, 0);
}

#[tokio::test]
async fn test_edit_reloads_and_drops_selection() {
    let h = Harness::in_memory().await;
    h.sandbox.click(Target::id("title")).unwrap();
    h.settle().await;

    let result = h
        .host
        .edit(SourceEdit::Replace {
            kind: SourceKind::Css,
            text: "h1 { margin: 0; }".to_string(),
        })
        .await
        .unwrap();
    assert!(result.changed);
    assert_eq!(result.version, 1);

    let host = h.host.snapshot().await.unwrap();
    assert_eq!(host.loads, 2);
    assert!(host.dirty);
    assert_eq!(host.selection, None);

    let sandbox = h.sandbox.snapshot().await.unwrap();
    assert_eq!(sandbox.loads, 2);
    assert_eq!(sandbox.selected, None);
}

#[tokio::test]
async fn test_unchanged_edit_does_not_reload() {
    let h = Harness::in_memory().await;

    let result = h
        .host
        .edit(SourceEdit::Replace {
            kind: SourceKind::Html,
            text: HTML.to_string(),
        })
        .await
        .unwrap();

    assert!(!result.changed);
    assert_eq!(h.host.snapshot().await.unwrap().loads, 1);
}

#[tokio::test]
async fn test_compose_failure_keeps_frame_and_retries() {
    let h = Harness::in_memory().await;

    h.host
        .edit(SourceEdit::Replace {
            kind: SourceKind::JavaScript,
            text: "const a = 1;\ndocument.write('</script>');".to_string(),
        })
        .await
        .unwrap();

    let host = h.host.snapshot().await.unwrap();
    assert!(host.status.is_failed());
    assert!(host.status.error().unwrap().contains("line 2"));
    assert_eq!(host.loads, 1);
    assert_eq!(h.sandbox.snapshot().await.unwrap().loads, 1);

    // Retrying unchanged source fails the same way
    assert!(h.host.refresh().await.unwrap().is_failed());

    h.host
        .edit(SourceEdit::Replace {
            kind: SourceKind::JavaScript,
            text: "const a = 1;".to_string(),
        })
        .await
        .unwrap();
    let status = h.host.refresh().await.unwrap();
    assert!(matches!(status, PreviewStatus::Loaded { version: 2, .. }));
    assert_eq!(h.sandbox.snapshot().await.unwrap().loads, 3);
}

#[tokio::test]
async fn test_insert_element_preselects_after_reload() {
    let h = Harness::in_memory().await;

    let preselection = h.host.insert_element("img").await.unwrap();
    assert_eq!(preselection.tag, "img");

    let host = h.host.snapshot().await.unwrap();
    assert_eq!(host.loads, 2);
    assert_eq!(host.selection, Some(preselection));

    let sandbox = h.sandbox.snapshot().await.unwrap();
    let button = sandbox.body_html.find("</button>").unwrap();
    let inserted = sandbox.body_html.find("<img>").unwrap();
    let closing = sandbox.body_html.rfind("</div>").unwrap();
    assert!(button < inserted && inserted < closing);
}

#[tokio::test]
async fn test_insert_unknown_element() {
    let h = Harness::in_memory().await;

    let err = h.host.insert_element("blink").await.unwrap_err();
    assert!(matches!(
        err,
        HostError::Editor(EditorError::UnknownElement(ref tag)) if tag == "blink"
    ));
    assert_eq!(h.host.snapshot().await.unwrap().loads, 1);
}

#[tokio::test]
async fn test_update_selection_merges_shallowly() {
    let h = Harness::in_memory().await;

    // Nothing selected yet
    assert!(!h.host.update_selection(SelectionPatch::default()).await.unwrap());

    h.sandbox.click(Target::id("go")).unwrap();
    h.settle().await;

    let mut patch = SelectionPatch::default();
    patch
        .properties
        .insert("title".to_string(), "Start".to_string());
    assert!(h.host.update_selection(patch).await.unwrap());

    let selection = h.host.snapshot().await.unwrap().selection.unwrap();
    assert_eq!(selection.properties["title"], "Start");
    assert_eq!(selection.properties["id"], "go");
}

#[tokio::test]
async fn test_element_update_round_trip() {
    let h = Harness::in_memory().await;
    h.sandbox.click(Target::id("title")).unwrap();
    h.settle().await;

    h.host
        .send_element_update(ElementUpdate {
            content: Some("Bye".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let sandbox = h.sandbox.snapshot().await.unwrap();
    assert_eq!(
        sandbox.selected.as_deref(),
        Some("<h1 id=\"title\" class=\"element-selected\">Bye</h1>")
    );
}

#[tokio::test]
async fn test_script_can_rewrite_its_source() {
    let h = Harness::in_memory().await;

    h.sandbox
        .script_post(EditorCodeUpdate {
            html: Some("<p id=\"fresh\">New</p>".to_string()),
            css: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
    h.settle().await;

    let host = h.host.snapshot().await.unwrap();
    assert_eq!(host.version, 1);
    assert!(host.dirty);
    assert_eq!(host.loads, 2);

    let sandbox = h.sandbox.snapshot().await.unwrap();
    assert!(sandbox.body_html.contains("<p id=\"fresh\">New</p>"));
}

#[tokio::test]
async fn test_mode_switch_reloads_without_listeners() {
    let h = Harness::in_memory().await;

    let status = h.host.set_mode(InteractionMode::Interaction).await.unwrap();
    assert!(matches!(status, PreviewStatus::Loaded { .. }));
    assert_eq!(h.host.snapshot().await.unwrap().loads, 2);

    // Same mode again is not a change
    h.host.set_mode(InteractionMode::Interaction).await.unwrap();
    assert_eq!(h.host.snapshot().await.unwrap().loads, 2);

    h.sandbox.click(Target::id("title")).unwrap();
    h.settle().await;

    let sandbox = h.sandbox.snapshot().await.unwrap();
    assert_eq!(sandbox.mode, Some(InteractionMode::Interaction));
    assert_eq!(sandbox.selected, None);
    assert_eq!(h.host.snapshot().await.unwrap().selection, None);
}

#[tokio::test]
async fn test_framework_switch() {
    let h = Harness::in_memory().await;

    h.host.set_framework(CssFramework::Tailwind).await.unwrap();
    let host = h.host.snapshot().await.unwrap();
    assert_eq!(host.framework, CssFramework::Tailwind);
    assert_eq!(host.loads, 2);
}

#[tokio::test]
async fn test_inspect_selected_button() {
    let h = Harness::in_memory().await;
    assert_eq!(h.host.inspect().await.unwrap(), None);

    h.sandbox.click(Target::id("go")).unwrap();
    h.settle().await;

    let inspection = h.host.inspect().await.unwrap().unwrap();
    assert_eq!(inspection.element.tag, "button");
    // Compound selectors are never matched
    assert_eq!(inspection.styles.external["color"], "red");
    assert_eq!(inspection.scripts.id_references, 1);
    assert_eq!(inspection.scripts.event_attributes[0].handler, "start()");
}

#[tokio::test]
async fn test_malformed_sandbox_messages_are_dropped() {
    let h = Harness::in_memory().await;

    h.poster.post_raw("{not json".to_string()).unwrap();
    h.poster
        .post_raw(r#"{"type":"mystery","data":{}}"#.to_string())
        .unwrap();
    h.poster
        .post_raw(r#"{"type":"element-selected","data":{"type":"p","properties":{},"content":"x"}}"#.to_string())
        .unwrap();

    let selection = h.host.snapshot().await.unwrap().selection.unwrap();
    assert_eq!(selection.tag, "p");
}

#[tokio::test]
async fn test_directory_project_save_and_disk_reload() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), HTML).unwrap();
    std::fs::write(dir.path().join("style.css"), CSS).unwrap();

    let h = Harness::start(SourceDocument::load(dir.path()).unwrap()).await;

    h.host.insert_element("img").await.unwrap();
    h.host.save().await.unwrap();

    let saved = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(saved.contains("  <img></img>\n</div>"));
    assert!(!h.host.snapshot().await.unwrap().dirty);
    assert!(dir.path().join("script.js").exists());

    let result = h
        .host
        .replace_from_disk(SourceKind::Css, "p { color: green; }".to_string())
        .await
        .unwrap();
    assert!(result.changed);
    assert_eq!(h.host.snapshot().await.unwrap().loads, 3);
}

#[tokio::test]
async fn test_memory_project_cannot_save() {
    let h = Harness::in_memory().await;
    let err = h.host.save().await.unwrap_err();
    assert!(matches!(err, HostError::Editor(EditorError::NotFileBacked)));
}

#[tokio::test]
async fn test_failed_disk_edit_reaches_remote_preview() {
    let (host_link, frame_link) = link();
    let (host, _host_task) = PreviewHost::new(
        EditSession::new(SourceDocument::from_buffers(SourceBuffers::new(HTML, CSS, JS))),
        host_link,
        ComposeOptions::default(),
    )
    .spawn();
    let (events, _relay_task) = spawn_relay(frame_link, host.status_updates());

    let mut rx = events.subscribe();
    let replay = events.replay().await;
    assert!(matches!(
        replay.last(),
        Some(PreviewEvent::Status { status: PreviewStatus::Loaded { version: 0, .. } })
    ));

    host.replace_from_disk(SourceKind::JavaScript, "x('</script>');".to_string())
        .await
        .unwrap();

    let failed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let PreviewEvent::Status { status } = rx.recv().await.unwrap() {
                if status.is_failed() {
                    return status;
                }
            }
        }
    })
    .await
    .unwrap();
    assert!(failed.error().unwrap().contains("line 1"));

    // Late subscribers see the failure too
    let replay = events.replay().await;
    assert!(matches!(
        replay.last(),
        Some(PreviewEvent::Status { status }) if status.is_failed()
    ));
}
