//! HTTP control panel
//!
//! Serves the panel page and the JSON endpoints behind it.
//!
//! # Routes
//!
//! - `GET /` - Panel page with the project list
//! - `GET /health` - Liveness check
//! - `GET /projects` - Project names (`{"success", "projects"}`)
//! - `POST /get-public-folders` - Folders of a project (body: `{"project": "..."}`)
//! - `POST /deploy` - Deploy a redirect site
//!   (body: `{"project", "folder", "siteName", "redirectUrl"}`)
//!
//! # Example
//!
//! ```no_run
//! use redirect_deployer::config::PanelConfig;
//! use redirect_deployer::server::PanelServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = PanelServer::new(PanelConfig::with_root("/srv/firebase"));
//!     server.run("127.0.0.1:5000").await.expect("Server failed");
//! }
//! ```

mod page;

pub use page::render_index;

use crate::config::PanelConfig;
use crate::deploy::{DeployOutcome, DeployRequest, Deployer};
use crate::{DeployerError, Result};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Request bodies are tiny JSON objects
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared server state
struct AppState {
    deployer: Deployer,
}

/// HTTP server for the redirect control panel
pub struct PanelServer {
    state: Arc<AppState>,
}

impl PanelServer {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                deployer: Deployer::new(config),
            }),
        }
    }

    /// Build the router
    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .route("/projects", get(list_projects))
            .route("/get-public-folders", post(get_public_folders))
            .route("/deploy", post(deploy))
            .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
            .with_state(state)
    }

    /// Run the server on the given address until Ctrl-C
    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| DeployerError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let config = self.state.deployer.config();
        tracing::info!(
            addr = ?listener.local_addr().ok(),
            projects_root = %config.projects_root.display(),
            firebase_cli = %config.firebase_cli.display(),
            "Redirect panel listening"
        );

        axum::serve(listener, Self::router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(DeployerError::Io)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down redirect panel");
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Request for a project's folders
#[derive(Debug, Deserialize)]
pub struct FoldersRequest {
    pub project: Option<String>,
}

/// Folder listing response
#[derive(Debug, Serialize)]
pub struct FoldersResponse {
    pub success: bool,
    pub folders: Vec<String>,
}

/// Project listing response
#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub projects: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    fn bad_request(error: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                success: false,
                error: error.to_string(),
            }),
        )
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let projects = state.deployer.list_projects();
    Html(render_index(&projects.names))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_projects(State(state): State<Arc<AppState>>) -> Json<ProjectsResponse> {
    let projects = state.deployer.list_projects();
    Json(ProjectsResponse {
        success: true,
        projects: projects.names,
    })
}

async fn get_public_folders(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<FoldersRequest>, JsonRejection>,
) -> std::result::Result<Json<FoldersResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(req) = body.map_err(|rejection| ErrorResponse::bad_request(rejection.body_text()))?;
    let project = req
        .project
        .ok_or_else(|| ErrorResponse::bad_request("Missing field: project"))?;

    let listing = state
        .deployer
        .list_folders(&project)
        .map_err(ErrorResponse::bad_request)?;

    Ok(Json(FoldersResponse {
        success: true,
        folders: listing.names,
    }))
}

async fn deploy(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<DeployRequest>, JsonRejection>,
) -> (StatusCode, Json<DeployOutcome>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Unreadable deploy request");
            return (
                StatusCode::BAD_REQUEST,
                Json(DeployOutcome::failed(rejection.body_text())),
            );
        }
    };

    match state.deployer.deploy(request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(DeployOutcome::failed(e.to_string())),
        ),
    }
}
