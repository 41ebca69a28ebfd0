// Customer Rewards - REST API
// Routes, request parsing and error mapping; all work is delegated to RewardsService

use crate::error::RewardsError;
use crate::model::{parse_iso_date, Customer, NewCustomer};
use crate::rewards::RewardsReport;
use crate::service::RewardsService;
use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
struct AppState {
    service: RewardsService,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Error body returned for every non-validation failure
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    pub status_code: u16,
    pub message: String,
    /// Request context, e.g. "uri=/api/rewards/addCustomer"
    pub details: String,
}

/// RewardsError plus the request it happened on
struct ApiError {
    error: RewardsError,
    details: String,
}

impl ApiError {
    fn new(error: RewardsError, uri: &axum::http::Uri) -> Self {
        Self {
            error,
            details: format!("uri={}", uri.path()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.error, details = %self.details, "request failed");
        } else {
            warn!(error = %self.error, details = %self.details, "request rejected");
        }

        match self.error {
            // Field-level failures are reported as a plain field -> message map
            RewardsError::Validation(fields) => (status, Json(fields)).into_response(),
            other => {
                let body = ErrorDetails {
                    status_code: status.as_u16(),
                    message: other.to_string(),
                    details: self.details,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RewardsQuery {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, RewardsError> {
    value.map(|raw| parse_iso_date(raw, field)).transpose()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/rewards/addCustomer - Create a customer with its transactions
async fn add_customer(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let missing = || RewardsError::InvalidRequest("Customer data is missing".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::new(missing(), &uri));
    }

    let request: NewCustomer = serde_json::from_slice::<Option<NewCustomer>>(&body)
        .map_err(|e| RewardsError::InvalidRequest(format!("Malformed request body: {}", e)))
        .and_then(|parsed| parsed.ok_or_else(missing))
        .map_err(|e| ApiError::new(e, &uri))?;

    let saved = state
        .service
        .add_customer(request)
        .map_err(|e| ApiError::new(e, &uri))?;

    info!(customer_id = saved.customer_id, "customer added");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/rewards/calculateRewards/:customer_id?startDate=..&endDate=..
async fn calculate_rewards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(customer_id): Path<String>,
    Query(query): Query<RewardsQuery>,
) -> Result<Json<RewardsReport>, ApiError> {
    let customer_id: i64 = customer_id.trim().parse().map_err(|_| {
        ApiError::new(
            RewardsError::InvalidRequest("Customer ID must be a positive number.".to_string()),
            &uri,
        )
    })?;

    let start = parse_date(query.start_date.as_deref(), "startDate").map_err(|e| ApiError::new(e, &uri))?;
    let end = parse_date(query.end_date.as_deref(), "endDate").map_err(|e| ApiError::new(e, &uri))?;

    let report = state
        .service
        .calculate_rewards(customer_id, start, end)
        .map_err(|e| ApiError::new(e, &uri))?;

    Ok(Json(report))
}

/// Build the axum router (separated for testing)
pub fn router(service: RewardsService) -> Router {
    let state = AppState { service };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/rewards/addCustomer", post(add_customer))
        .route("/rewards/calculateRewards/:customer_id", get(calculate_rewards))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
