//! HTTP and WebSocket front door
//!
//! `GET /items` answers the bootstrap request, `GET /ws` upgrades to
//! the viewer event stream. The server runs on its own tokio runtime;
//! the service loop only watches for it to die.
use super::{BidHandler, LoopService};
use crate::{
    auction::Amount,
    broadcast::ViewerRegistry,
    clock::SharedClock,
    event::{Bootstrap, ViewerIdRef},
    store::SharedAuctionStore,
};
use anyhow::{format_err, Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedAuctionStore,
    pub registry: Arc<ViewerRegistry>,
    pub handler: BidHandler,
    pub clock: SharedClock,
    pub bid_increment: Amount,
}

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/items", get(get_items))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn get_items(State(state): State<AppState>) -> Result<Json<Bootstrap>, UiError> {
    Ok(Json(bootstrap(&state)?))
}

pub fn bootstrap(state: &AppState) -> Result<Bootstrap> {
    Ok(Bootstrap {
        server_time: state.clock.now()?,
        items: state.store.snapshot(),
        bid_increment: state.bid_increment,
    })
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| viewer_session(socket, state))
}

async fn viewer_session(socket: WebSocket, state: AppState) {
    let (viewer, mut events) = state.registry.register();
    info!(%viewer, viewers = state.registry.len(), "viewer connected");

    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let handler = state.handler.clone();
        let viewer = viewer.clone();
        async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => handler.handle_message(&viewer, &text),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%viewer, error = %e, "viewer connection error");
                        break;
                    }
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    disconnect(&state.registry, &viewer);
}

fn disconnect(registry: &ViewerRegistry, viewer: ViewerIdRef) {
    registry.unregister(viewer);
    info!(viewer, viewers = registry.len(), "viewer disconnected");
}

async fn run_http_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let server = axum::Server::try_bind(&addr)
        .with_context(|| format!("failed to bind {addr}"))?
        .serve(app.into_make_service());
    info!(%addr, "listening");
    server.await?;

    Ok(())
}

pub struct Ui {
    // cancels all tasks on drop
    _runtime: Runtime,
    server_rx: oneshot::Receiver<Result<()>>,
}

impl Ui {
    pub fn new(state: AppState, addr: SocketAddr) -> Result<Self> {
        let runtime = Runtime::new()?;

        let (tx, rx) = oneshot::channel();

        runtime.spawn(async move {
            let res = run_http_server(state, addr)
                .await
                .context("failed to run http server");
            // receiver gone means the service is already shutting down
            let _ = tx.send(res);
        });

        Ok(Self {
            _runtime: runtime,
            server_rx: rx,
        })
    }
}

impl LoopService for Ui {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn run_iteration(&mut self) -> Result<()> {
        // don't hog the cpu
        std::thread::sleep(std::time::Duration::from_millis(100));

        match self.server_rx.try_recv() {
            Ok(res) => res.and_then(|()| Err(format_err!("ui server stopped unexpectedly"))),
            Err(oneshot::error::TryRecvError::Empty) => Ok(()),
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(format_err!("ui server died without leaving a response"))
            }
        }
    }
}
