// Stock Pairing - REST API with Axum
//
// Routes live in the library so the router can be driven in tests without
// binding a socket. bin/server.rs only wires config and the listener.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::budget::{Budget, BudgetLimits};
use crate::error::StockError;
use crate::product::{ProductRequest, ProductResponse};
use crate::service::{self, FilteredProductsResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    limits: BudgetLimits,
}

impl AppState {
    pub fn new(conn: Connection, limits: BudgetLimits) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            limits,
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StockError> {
        self.db.lock().map_err(|_| StockError::Lock)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub budget: i64,
}

impl IntoResponse for StockError {
    fn into_response(self) -> Response {
        let status = match self {
            StockError::Validation { .. } => StatusCode::BAD_REQUEST,
            StockError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => {
                error!("request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            StockError::Validation { message } => message.clone(),
            other => other.to_string(),
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// Malformed or mistyped JSON bodies get the same 400 shape as other validation errors
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, StockError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| StockError::validation(rejection.body_text()))
}

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), StockError>;

fn ok<T>(status: StatusCode, data: T) -> ApiResult<T> {
    Ok((status, Json(ApiResponse::ok(data))))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/products - All products, newest load date first
async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<ProductResponse>> {
    let conn = state.conn()?;
    ok(StatusCode::OK, service::list_products(&conn)?)
}

/// GET /api/products/:id
async fn get_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<ProductResponse> {
    let conn = state.conn()?;
    ok(StatusCode::OK, service::get_product(&conn, id)?)
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<ProductResponse> {
    let request = body(payload)?;
    let conn = state.conn()?;
    ok(StatusCode::CREATED, service::create_product(&conn, &request)?)
}

/// PUT /api/products/:id
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<ProductResponse> {
    let request = body(payload)?;
    let conn = state.conn()?;
    ok(StatusCode::OK, service::update_product(&conn, id, &request)?)
}

/// DELETE /api/products/:id
async fn delete_product(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, StockError> {
    let conn = state.conn()?;
    service::delete_product(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/products/filter - Best PRODUNO + PRODDOS pair within budget
async fn filter_products(
    State(state): State<AppState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<FilteredProductsResponse> {
    let request = body(payload)?;
    let budget = Budget::new(request.budget, &state.limits)?;
    let conn = state.conn()?;
    ok(StatusCode::OK, service::find_best_pair(&conn, budget)?)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products).post(create_product))
        .route("/products/filter", post(filter_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
