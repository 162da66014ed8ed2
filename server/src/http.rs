use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use platform_api::{ApiError, ApiResult};
use platform_db::DbPool;
use products_hr::{Employee, EmployeeChanges, EmployeeError, EmployeeService};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::AppConfig;

pub const DELETED_MESSAGE: &str = "Employee deleted successfully";

#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub config: Arc<AppConfig>,
    pub pool: Option<DbPool>,
}

impl AppState {
    pub fn new(employees: EmployeeService, config: Arc<AppConfig>) -> Self {
        Self {
            employees,
            config,
            pool: None,
        }
    }

    /// Attach the pool the health endpoint should probe.
    pub fn with_pool(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/employees",
            get(list_employees).post(create_employee),
        )
        .route(
            "/api/employees/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

type EmployeeId = WithRejection<Path<i64>, ApiError>;
type Body<T> = WithRejection<Json<T>, ApiError>;

async fn create_employee(
    State(state): State<AppState>,
    WithRejection(Json(candidate), _): Body<Employee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let created = state
        .employees
        .create(candidate)
        .await
        .map_err(employee_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state.employees.list_all().await.map_err(employee_error)?;
    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    WithRejection(Path(id), _): EmployeeId,
) -> ApiResult<Json<Employee>> {
    state
        .employees
        .get_by_id(id)
        .await
        .map_err(employee_error)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn update_employee(
    State(state): State<AppState>,
    WithRejection(Path(id), _): EmployeeId,
    WithRejection(Json(changes), _): Body<EmployeeChanges>,
) -> ApiResult<Json<Employee>> {
    let mut existing = state
        .employees
        .get_by_id(id)
        .await
        .map_err(employee_error)?
        .ok_or(ApiError::NotFound)?;
    existing.apply(changes);
    let updated = state
        .employees
        .update(existing)
        .await
        .map_err(employee_error)?;
    Ok(Json(updated))
}

async fn delete_employee(
    State(state): State<AppState>,
    WithRejection(Path(id), _): EmployeeId,
) -> ApiResult<(StatusCode, &'static str)> {
    state
        .employees
        .delete_by_id(id)
        .await
        .map_err(employee_error)?;
    Ok((StatusCode::OK, DELETED_MESSAGE))
}

fn employee_error(err: EmployeeError) -> ApiError {
    match err {
        EmployeeError::DuplicateResource { .. } => ApiError::Conflict(err.to_string()),
        EmployeeError::Storage(_) => ApiError::internal(err),
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = match &state.pool {
        Some(pool) => platform_db::ping(pool).await,
        None => false,
    };
    Json(HealthResponse {
        ok: true,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
