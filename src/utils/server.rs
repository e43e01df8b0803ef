use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use tower_http::services::ServeDir;
use crate::config::{Config, Paths};
use crate::models::Taxonomy;
use crate::utils::render::render_page;
use crate::utils::scanner::TaxonomyScanner;

pub struct AppState {
    scanner: TaxonomyScanner,
    quiz_base: PathBuf,
}

impl AppState {
    pub fn new(config: Config, paths: &Paths) -> Result<Self> {
        Ok(Self {
            scanner: TaxonomyScanner::new(config)?,
            quiz_base: paths.quiz_base.clone(),
        })
    }

    // Fresh scan on every call, nothing is cached between requests.
    pub fn scan(&self) -> Result<Taxonomy> {
        self.scanner.scan(&self.quiz_base)
    }
}

// Turns any scan failure into a 500 while keeping the cause in the logs.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub fn router(config: Config, paths: &Paths) -> Result<Router> {
    config.validate()?;
    let mount = format!("/{}", config.root_folder);
    let state = Arc::new(AppState::new(config, paths)?);

    Ok(Router::new()
        .route("/", get(index))
        .route("/api/quizzes", get(quizzes))
        .nest_service(&mount, ServeDir::new(&paths.static_root))
        .fallback_service(ServeDir::new(&paths.public_dir))
        .with_state(state))
}

async fn scan_blocking(state: Arc<AppState>) -> Result<Taxonomy> {
    tokio::task::spawn_blocking(move || state.scan())
        .await
        .context("Scan task panicked")?
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let taxonomy = scan_blocking(state).await?;
    info!(
        "Rendering index with {} grade(s), {} quiz(zes)",
        taxonomy.grades.len(),
        taxonomy.quiz_count()
    );
    Ok(Html(render_page(&taxonomy)))
}

async fn quizzes(State(state): State<Arc<AppState>>) -> Result<Json<Taxonomy>, AppError> {
    Ok(Json(scan_blocking(state).await?))
}

pub async fn serve(config: Config, paths: Paths) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(config, &paths)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://localhost:{}", addr.port());
    info!("Serving quizzes from {}", paths.quiz_base.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
