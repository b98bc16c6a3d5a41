//! HTTP extraction service.
//!
//! `GET /readability?url=<url>` answers `200 {url, title, excerpt}`,
//! `400 {error}` when `url` is missing and `500 {error}` when extraction fails.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::app::Result;
use crate::domain::excerpt_of;
use crate::extractor::Extractor;

/// Excerpt length of the service response.
pub const SERVICE_EXCERPT_LENGTH: usize = 200;

#[derive(Clone)]
struct ServiceState {
    extractor: Arc<dyn Extractor>,
}

#[derive(Debug, Deserialize)]
struct ReadabilityQuery {
    url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ArticleSummary {
    pub url: String,
    pub title: String,
    pub excerpt: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(extractor: Arc<dyn Extractor>) -> Router {
    Router::new()
        .route("/readability", get(readability))
        .layer(CorsLayer::permissive())
        .with_state(ServiceState { extractor })
}

/// Serve the extraction service on `bind` until Ctrl-C.
pub async fn serve(bind: &str, extractor: Arc<dyn Extractor>) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Extraction service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(extractor))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Extraction service shutting down");
        })
        .await?;

    Ok(())
}

async fn readability(
    State(state): State<ServiceState>,
    Query(query): Query<ReadabilityQuery>,
) -> Response {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing url parameter".into());
    };

    match state.extractor.extract(&url).await {
        Ok(article) => {
            let excerpt = if article.text_content.is_empty() {
                excerpt_of(&article.excerpt, SERVICE_EXCERPT_LENGTH)
            } else {
                excerpt_of(&article.text_content, SERVICE_EXCERPT_LENGTH)
            };
            info!("Served extraction for {}", url);
            Json(ArticleSummary {
                url,
                title: article.title,
                excerpt,
            })
            .into_response()
        }
        Err(e) => {
            error!("Extraction of {} failed: {}", url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
