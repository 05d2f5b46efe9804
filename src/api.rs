// HTTP transport: search and price update routes over an OfferCatalog

use crate::catalog::{CatalogStatsReport, OfferCatalog};
use crate::entities::{format_date, parse_date, OfferUpdate};
use crate::error::{BatchError, CatalogError};
use crate::search::SearchResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub type SharedCatalog = Arc<dyn OfferCatalog>;

pub const NO_OFFERS_MESSAGE: &str = "No offers found for entered query";
pub const UPDATED_MESSAGE: &str = "Hotel advertiser updated!";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("End date {end} must not be before start date {start}")]
    InvalidWindow { start: String, end: String },

    // Request body missing, not JSON, or not an array of updates
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    fn cause(&self) -> Option<&CatalogError> {
        match self {
            ApiError::Catalog(err) => Some(err),
            ApiError::Batch(err) => Some(&err.cause),
            ApiError::InvalidWindow { .. } | ApiError::InvalidBody(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.cause() {
            Some(err) if !err.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<usize>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(err = %self, "request failed on store inconsistency");
        }

        let body = ErrorBody {
            error: match self.cause() {
                Some(cause) => cause.to_string(),
                None => self.to_string(),
            },
            applied: match &self {
                ApiError::Batch(err) => Some(err.applied),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_app(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/search/:city/:start/:end", get(search_offers))
        .route("/price/", post(update_offers))
        .route("/stats", get(catalog_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

pub async fn start_server(addr: SocketAddr, catalog: SharedCatalog) -> std::io::Result<()> {
    let app = create_app(catalog);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await
}

fn parse_window(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let start_date = parse_date("start_date", start)?;
    let end_date = parse_date("end_date", end)?;
    if end_date < start_date {
        return Err(ApiError::InvalidWindow {
            start: format_date(start_date),
            end: format_date(end_date),
        });
    }
    Ok((start_date, end_date))
}

async fn search_offers(
    State(catalog): State<SharedCatalog>,
    Path((city, start, end)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let (start_date, end_date) = parse_window(&start, &end)?;
    let result: SearchResult = catalog.search(&city, start_date, end_date).await?;

    if result.is_empty() {
        let body = MessageBody {
            message: NO_OFFERS_MESSAGE.to_string(),
        };
        return Ok(Json(body).into_response());
    }
    Ok(Json(result).into_response())
}

async fn update_offers(
    State(catalog): State<SharedCatalog>,
    payload: Result<Json<Vec<OfferUpdate>>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let Json(updates) =
        payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    catalog.update(updates).await?;
    Ok(Json(MessageBody {
        message: UPDATED_MESSAGE.to_string(),
    }))
}

async fn catalog_stats(State(catalog): State<SharedCatalog>) -> Json<CatalogStatsReport> {
    Json(catalog.stats())
}
