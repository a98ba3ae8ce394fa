//! HTTP server for the chat and presence API
//!
//! Every handler performs at most one store operation. The database handle
//! is the only state shared between requests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use buddy_core::{Database, Message, MessageRepository, NewMessage, StatusRecord, StatusRepository};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::protocol::{MessagesQuery, SendRequest, StatusQuery, StatusRequest};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Run one store operation while holding the database lock
    fn with_db<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Database) -> buddy_core::Result<T>,
    ) -> std::result::Result<T, ApiError> {
        let db = self.db.lock().map_err(|_| ApiError::Unavailable)?;
        f(&*db).map_err(ApiError::during(operation))
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send", post(send_message))
        .route("/messages", get(list_messages))
        .route("/status", post(set_status).get(get_statuses))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn send_message(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SendRequest>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    let message = NewMessage::new(payload.user, payload.text, payload.recipient)
        .map_err(ApiError::during("message insert"))?;

    let stored = state.with_db("message insert", |db| db.create_message(&message))?;
    debug!(id = stored.id, user = %stored.sender, "Message stored");

    Ok(StatusCode::OK)
}

async fn list_messages(
    State(state): State<AppState>,
    query: std::result::Result<Query<MessagesQuery>, QueryRejection>,
) -> std::result::Result<Json<Vec<Message>>, ApiError> {
    let Query(query) = query?;
    let messages = state.with_db("message fetch", |db| db.list_messages_for(query.user()))?;
    Ok(Json(messages))
}

async fn set_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StatusRequest>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    let record = StatusRecord::new(payload.user, payload.status, payload.message)
        .map_err(ApiError::during("status update"))?;

    state.with_db("status update", |db| db.upsert_status(&record))?;
    debug!(user = %record.user, status = %record.status, "Status updated");

    Ok(StatusCode::OK)
}

async fn get_statuses(
    State(state): State<AppState>,
    query: std::result::Result<Query<StatusQuery>, QueryRejection>,
) -> std::result::Result<Json<Vec<StatusRecord>>, ApiError> {
    let Query(query) = query?;
    let users = query.names();

    if users.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let statuses = state.with_db("status fetch", |db| db.find_statuses(&users))?;
    Ok(Json(statuses))
}

/// Running server handle
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl Server {
    /// Bind to `addr` and start serving in the background
    ///
    /// Port 0 picks a free port; see [`Server::addr`].
    pub async fn start(addr: SocketAddr, db: Arc<Mutex<Database>>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let bound_addr = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let app = router(AppState::new(db));

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                    info!("Server shutting down");
                })
                .await
        });

        info!(addr = %bound_addr, "Server started");

        Ok(Server {
            addr: bound_addr,
            shutdown_tx,
            task,
        })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Ask the server to stop accepting connections
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Wait until the server has stopped
    pub async fn stopped(self) -> Result<()> {
        self.task.await??;
        Ok(())
    }
}
