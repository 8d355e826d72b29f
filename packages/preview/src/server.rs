//! HTTP surface for a running preview frame.
//!
//! - `GET /` latest render as a full HTML document
//! - `GET /api/preview` server-sent events, one per render
//! - `GET /api/layout` layout of the latest render as JSON

use crate::error::PreviewResult;
use crate::frame::FrameRender;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Json, Response,
    },
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use storefront_engine::{to_html, HtmlOptions};
use tokio::sync::watch;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tower_http::cors::CorsLayer;
use tracing::info;

type Renders = watch::Receiver<Option<Arc<FrameRender>>>;

#[derive(Clone)]
struct AppState {
    renders: Renders,
    title: Arc<str>,
}

/// Payload of one `render` server-sent event
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEvent {
    pub version: u64,
    pub html: String,
    pub block_ids: Vec<String>,
    pub unresolved: usize,
    pub stale: bool,
    pub timestamp: i64,
}

impl From<&FrameRender> for PreviewEvent {
    fn from(render: &FrameRender) -> Self {
        Self {
            version: render.version,
            html: render.html.clone(),
            block_ids: render.page.block_ids().into_iter().map(String::from).collect(),
            unresolved: render.unresolved,
            stale: render.stale,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

pub fn router(renders: Renders, title: &str) -> Router {
    let state = AppState {
        renders,
        title: Arc::from(title),
    };

    Router::new()
        .route("/", get(page_handler))
        .route("/api/preview", get(preview_sse_handler))
        .route("/api/layout", get(layout_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn serve(addr: SocketAddr, renders: Renders, title: &str) -> PreviewResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Preview server listening");
    axum::serve(listener, router(renders, title)).await?;
    Ok(())
}

async fn page_handler(State(state): State<AppState>) -> Response {
    let latest = state.renders.borrow().clone();
    match latest {
        Some(render) => {
            let options = HtmlOptions {
                title: state.title.to_string(),
                ..HtmlOptions::default().document()
            };
            Html(to_html(&render.page, options)).into_response()
        }
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html("<!DOCTYPE html><html><body><p>Waiting for the editor…</p></body></html>"),
        )
            .into_response(),
    }
}

async fn layout_handler(State(state): State<AppState>) -> Response {
    let latest = state.renders.borrow().clone();
    match latest {
        Some(render) => Json(render.layout.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn preview_sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Starting preview stream");

    let stream = WatchStream::new(state.renders.clone()).filter_map(|latest| {
        let render = latest?;
        let payload = serde_json::to_string(&PreviewEvent::from(render.as_ref())).ok()?;
        Some(Ok(Event::default().event("render").data(payload)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preview_event_from_render() {
        use storefront_engine::{LayoutEngine, RenderContext};
        use storefront_layout::{Block, Props};

        let layout = vec![Block::new("f", "Footer", Props::new())];
        let page = LayoutEngine::default().render(&layout, &RenderContext::default());
        let render = FrameRender {
            version: 3,
            layout,
            html: to_html(&page, HtmlOptions::compact()),
            page,
            unresolved: 0,
            stale: true,
        };

        let event = PreviewEvent::from(&render);
        assert_eq!(event.version, 3);
        assert_eq!(event.block_ids, vec!["f"]);
        assert!(event.stale);
    }
}
