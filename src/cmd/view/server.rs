// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use axum::Form;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use eduview_core::config::ViewerConfig;
use eduview_core::deck::KindFilter;
use eduview_core::error::Fallible;
use eduview_core::error::fail;
use eduview_core::pager::Navigate;
use eduview_core::types::kind::ContentKind;
use eduview_core::viewer::Viewer;
use maud::html;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::Sender;
use tokio::sync::oneshot::channel;

use crate::cmd::content::ContentFile;
use crate::cmd::content::read_raw_content;
use crate::cmd::view::render::render_viewer;
use crate::cmd::view::template::page_template;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub file: String,
    pub kind: Option<ContentKind>,
    pub raw_content: Option<String>,
    pub host: String,
    pub port: u16,
    pub viewer: ViewerConfig,
}

#[derive(Clone)]
struct ServerState {
    title: String,
    viewer: Arc<Mutex<Viewer>>,
    shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl ServerState {
    fn viewer(&self) -> MutexGuard<'_, Viewer> {
        self.viewer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let content = ContentFile::read(&config.file)?;
    let Some(kind) = content.resolve_kind(config.kind) else {
        return fail("could not tell what kind of content this is; pass --kind.");
    };
    let raw = read_raw_content(config.raw_content)?;
    let title: String = content.metadata.title.clone().unwrap_or_else(|| {
        Path::new(&config.file)
            .file_stem()
            .and_then(|os_str| os_str.to_str())
            .unwrap_or("eduview")
            .to_string()
    });

    // The page is re-rendered on every request, so there is nothing to animate.
    let viewer = Viewer::load(kind, &content.body, raw.as_ref(), &config.viewer.instant());
    log::info!(
        "Loaded {} {kind} via {}.",
        viewer.total(),
        viewer.extraction_path()
    );

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        title,
        viewer: Arc::new(Mutex::new(viewer)),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or the quit button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
enum Action {
    Previous,
    Next,
    Jump,
    Filter,
    Quit,
}

#[derive(Debug, Deserialize)]
struct ActionForm {
    action: Action,
    /// One-based, as shown on the page.
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    filter: Option<KindFilter>,
}

async fn get_handler(State(state): State<ServerState>) -> Html<String> {
    let viewer = state.viewer();
    let body = render_viewer(&state.title, &viewer);
    Html(page_template(&state.title, body).into_string())
}

async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<ActionForm>,
) -> (StatusCode, Html<String>) {
    let mut viewer = state.viewer();
    match form.action {
        Action::Previous => {
            viewer.go_to_previous();
        }
        Action::Next => {
            viewer.go_to_next();
        }
        Action::Jump => match form.index {
            Some(index) => {
                viewer.jump_to(index.saturating_sub(1));
            }
            None => return bad_request("Jump needs an index."),
        },
        Action::Filter => match form.filter {
            Some(filter) => {
                if !viewer.set_filter(filter) {
                    return bad_request("Only flashcards can be filtered.");
                }
            }
            None => return bad_request("Filter needs a filter."),
        },
        Action::Quit => {
            let mut tx = state.shutdown_tx.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
            let body = html! {
                div.root {
                    h1 { "Goodbye" }
                    p { "You can close this tab." }
                }
            };
            return (
                StatusCode::OK,
                Html(page_template(&state.title, body).into_string()),
            );
        }
    }
    // Transitions are instant here, but settle any that were left pending.
    viewer.finish_transition();
    log::debug!("{:?}: now at {}/{}.", form.action, viewer.position() + 1, viewer.len());
    let body = render_viewer(&state.title, &viewer);
    (
        StatusCode::OK,
        Html(page_template(&state.title, body).into_string()),
    )
}

fn bad_request(message: &str) -> (StatusCode, Html<String>) {
    (StatusCode::BAD_REQUEST, Html(message.to_string()))
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
