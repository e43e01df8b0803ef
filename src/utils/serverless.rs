use std::path::PathBuf;
use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::ServiceExt;
use crate::config::{Config, Deployment};
use crate::utils::server::router;

// Answers a single request the way a function invocation does: resolve paths, build the router,
// serve once and drop everything.
pub async fn handle(config: Config, function_dir: PathBuf, request: Request<Body>) -> Result<Response> {
    let paths = config.resolve(&Deployment::Serverless { function_dir })?;
    let app = router(config, &paths)?;
    app.oneshot(request).await.context("Serverless invocation failed")
}
