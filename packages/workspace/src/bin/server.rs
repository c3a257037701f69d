use atelier_composer::{ComposeOptions, CssFramework};
use atelier_editor::{EditSession, SourceDocument, SourceKind};
use atelier_protocol::{link, InteractionMode, MessagePoster};
use atelier_workspace::{
    spawn_relay, Config, HostHandle, PreviewEvents, PreviewHost, ProjectWatcher,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

const HOST_PAGE: &str = include_str!("host_page.html");

#[derive(Debug)]
struct Options {
    /// Directory holding the project files (`srcDir` under the root)
    project_dir: PathBuf,
    port: u16,
    mode: InteractionMode,
    framework: CssFramework,
}

fn usage() {
    println!("Usage: atelier-server [OPTIONS] [ROOT_DIR]");
    println!();
    println!("Options:");
    println!("  -p, --port <PORT>          HTTP port to listen on (default: config, else 3030)");
    println!("  --mode <MODE>              selection | interaction (default: config)");
    println!("  --framework <NAME>         pure | tailwind | bootstrap (default: config)");
    println!("  -h, --help                 Show this help message");
    println!();
    println!("Arguments:");
    println!("  [ROOT_DIR]                 Directory holding atelier.config.json (default: current dir)");
}

/// Command-line flags over the root's config file; `None` means help was shown
fn parse_args(
    args: impl IntoIterator<Item = String>,
    cwd: &Path,
) -> anyhow::Result<Option<Options>> {
    let mut root = cwd.to_path_buf();
    let mut port = None;
    let mut mode = None;
    let mut framework = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" | "-p" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--port requires a value"))?;
                port = Some(value.parse::<u16>()?);
            }
            "--mode" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--mode requires a value"))?;
                mode = Some(value.parse::<InteractionMode>()?);
            }
            "--framework" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--framework requires a value"))?;
                framework = Some(value.parse::<CssFramework>().map_err(anyhow::Error::msg)?);
            }
            "--help" | "-h" => {
                usage();
                return Ok(None);
            }
            other if !other.starts_with('-') => root = cwd.join(other),
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    let config = Config::load(&root)?;
    Ok(Some(Options {
        project_dir: config.get_src_dir(&root),
        port: port.unwrap_or(config.port),
        mode: mode.unwrap_or(config.mode),
        framework: framework.unwrap_or(config.framework),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(options) = parse_args(std::env::args().skip(1), &std::env::current_dir()?)? else {
        return Ok(());
    };

    let document = SourceDocument::load(&options.project_dir)?;
    let mut session = EditSession::new(document);
    session.set_mode(options.mode);

    let (host_link, frame_link) = link();
    let poster = frame_link.poster();

    let compose_options = ComposeOptions::with_framework(options.framework);
    let (host, _host_task) = PreviewHost::new(session, host_link, compose_options).spawn();
    let (events, _relay_task) = spawn_relay(frame_link, host.status_updates());

    spawn_watcher(options.project_dir.clone(), host.clone());

    let state = Arc::new(HttpState {
        host,
        events,
        poster,
    });

    let app = Router::new()
        .route("/", get(|| async { Html(HOST_PAGE) }))
        .route("/api/events", get(events_handler))
        .route("/api/message", post(message_handler))
        .route("/api/selection", get(selection_handler))
        .route("/api/refresh", post(refresh_handler))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = format!("127.0.0.1:{}", options.port);
    tracing::info!(project = ?options.project_dir, "serving preview on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

struct HttpState {
    host: HostHandle,
    events: PreviewEvents,
    poster: MessagePoster,
}

fn spawn_watcher(root: PathBuf, host: HostHandle) {
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || {
        let watcher = match ProjectWatcher::new(root.clone()) {
            Ok(watcher) => watcher,
            Err(e) => {
                tracing::error!("File watching disabled: {}", e);
                return;
            }
        };

        while let Some(kinds) = watcher.next_change() {
            for kind in kinds {
                reload_from_disk(&runtime, &root, kind, &host);
            }
        }
    });
}

fn reload_from_disk(
    runtime: &tokio::runtime::Handle,
    root: &Path,
    kind: SourceKind,
    host: &HostHandle,
) {
    let path = root.join(kind.file_name());
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    match runtime.block_on(host.replace_from_disk(kind, text)) {
        Ok(result) if result.changed => {
            tracing::info!(%kind, version = result.version, "source changed on disk")
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Failed to apply disk change: {}", e),
    }
}

/// SSE stream: the latest load and status, then live updates
async fn events_handler(
    State(state): State<Arc<HttpState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let initial = state.events.replay().await;

    tracing::info!("preview client connected");

    let initial_stream = stream::iter(
        initial
            .into_iter()
            .map(|event| Ok(Event::default().data(event.to_json()))),
    );

    let broadcast_stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((Ok(Event::default().data(event.to_json())), rx)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("[SSE] Subscriber lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("[SSE] Event channel closed");
                    return None;
                }
            }
        }
    });

    Sse::new(initial_stream.chain(broadcast_stream)).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(15))
            .text("ping"),
    )
}

/// Raw protocol JSON relayed from the browser frame
async fn message_handler(State(state): State<Arc<HttpState>>, body: String) -> impl IntoResponse {
    match state.poster.post_raw(body) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::error!("Failed to forward sandbox message: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn selection_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let snapshot = match state.host.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e),
    };
    let inspection = match state.host.inspect().await {
        Ok(inspection) => inspection,
        Err(e) => return error_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": snapshot.status,
            "mode": snapshot.mode,
            "version": snapshot.version,
            "selection": snapshot.selection,
            "inspection": inspection,
        })),
    )
}

/// Retry after a failed composition
async fn refresh_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    match state.host.refresh().await {
        Ok(status) => (StatusCode::OK, Json(serde_json::json!({ "status": status }))),
        Err(e) => error_response(e),
    }
}

fn error_response(e: impl std::fmt::Display) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
}
