//! Report generation routes.
//!
//! One POST endpoint per report kind. Order of operations per request:
//! auth (middleware) → parameter validation (no queries yet) → store
//! fetch → payload build → render → binary attachment response.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;

use crate::error::error_response;
use crate::{AppState, middleware::AuthUser};
use gestia_shared::AppError;
use gestia_core::render::{
    RenderedReport, ReportFormat, render_income_expense, render_inventory, render_purchases,
    render_sales,
};
use gestia_core::reports::{
    build_income_expense_report, build_inventory_report, build_purchases_report,
    build_sales_report,
    types::{Periodo, SalesTargets},
};
use gestia_db::repositories::{
    inventory::InventoryRepository,
    movements::{DateWindow, MovementRepository},
};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/ventas", post(generate_sales_report))
        .route("/reports/compras", post(generate_purchases_report))
        .route(
            "/reports/ingresos-egresos",
            post(generate_income_expense_report),
        )
        .route("/reports/inventario", post(generate_inventory_report))
}

// ============================================================================
// Request Validation
// ============================================================================

/// Report request body. Fields arrive as strings so every malformed value
/// gets the same 400 treatment as a missing one, before any query runs.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// Inclusive start date (ISO).
    #[serde(rename = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    /// Inclusive end date (ISO).
    #[serde(rename = "fechaFin")]
    pub fecha_fin: Option<String>,
    /// Target format: `pdf` or `excel`.
    pub formato: Option<String>,
}

fn validation_error(message: &str) -> Response {
    error_response(&AppError::Validation(message.to_string()))
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| validation_error(&format!("{field} must be an ISO date (YYYY-MM-DD)")))
}

impl ReportRequest {
    /// Checks presence and shape of the three fields.
    ///
    /// Rejects before any store access; an unsupported `formato` never
    /// triggers a query.
    fn validate(&self) -> Result<(Periodo, ReportFormat), Response> {
        let Some(fecha_inicio) = self.fecha_inicio.as_deref() else {
            return Err(validation_error("fechaInicio is required"));
        };
        let Some(fecha_fin) = self.fecha_fin.as_deref() else {
            return Err(validation_error("fechaFin is required"));
        };
        let Some(formato) = self.formato.as_deref() else {
            return Err(validation_error("formato is required"));
        };

        let fecha_inicio = parse_date(fecha_inicio, "fechaInicio")?;
        let fecha_fin = parse_date(fecha_fin, "fechaFin")?;
        let Some(formato) = ReportFormat::parse(formato) else {
            return Err(validation_error("formato must be either pdf or excel"));
        };

        Ok((
            Periodo {
                fecha_inicio,
                fecha_fin,
            },
            formato,
        ))
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn attachment_response(rendered: RenderedReport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", rendered.filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, rendered.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(rendered.bytes),
    )
        .into_response()
}

/// Generic 500; internal detail stays in the logs.
fn report_error(message: &str) -> Response {
    error_response(&AppError::Internal(message.to_string()))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /reports/ventas
#[axum::debug_handler]
async fn generate_sales_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ReportRequest>,
) -> Response {
    let (periodo, formato) = match request.validate() {
        Ok(validated) => validated,
        Err(response) => return response,
    };

    let repo = MovementRepository::new((*state.db).clone());
    let ventas = match repo
        .sales_in_range(
            auth_user.user_id(),
            DateWindow::closed(periodo.fecha_inicio, periodo.fecha_fin),
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to query sales report");
            return report_error("Failed to generate sales report");
        }
    };

    let targets = SalesTargets {
        venta_alta: state.reports.high_value_sale,
        meta_mensual: state.reports.monthly_goal,
    };
    let report = build_sales_report(periodo, &ventas, &targets);

    match render_sales(&report, formato) {
        Ok(rendered) => attachment_response(rendered),
        Err(e) => {
            error!(error = %e, "Failed to render sales report");
            report_error("Failed to generate sales report")
        }
    }
}

/// POST /reports/compras
#[axum::debug_handler]
async fn generate_purchases_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ReportRequest>,
) -> Response {
    let (periodo, formato) = match request.validate() {
        Ok(validated) => validated,
        Err(response) => return response,
    };

    let repo = MovementRepository::new((*state.db).clone());
    let compras = match repo
        .purchases_in_range(
            auth_user.user_id(),
            DateWindow::closed(periodo.fecha_inicio, periodo.fecha_fin),
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to query purchases report");
            return report_error("Failed to generate purchases report");
        }
    };

    let report = build_purchases_report(periodo, &compras);

    match render_purchases(&report, formato) {
        Ok(rendered) => attachment_response(rendered),
        Err(e) => {
            error!(error = %e, "Failed to render purchases report");
            report_error("Failed to generate purchases report")
        }
    }
}

/// POST /reports/ingresos-egresos
#[axum::debug_handler]
async fn generate_income_expense_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ReportRequest>,
) -> Response {
    let (periodo, formato) = match request.validate() {
        Ok(validated) => validated,
        Err(response) => return response,
    };

    let repo = MovementRepository::new((*state.db).clone());
    let window = DateWindow::closed(periodo.fecha_inicio, periodo.fecha_fin);

    let ingresos = match repo.incomes_in_range(auth_user.user_id(), window).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to query income-expense report");
            return report_error("Failed to generate income-expense report");
        }
    };
    let egresos = match repo.expenses_in_range(auth_user.user_id(), window).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to query income-expense report");
            return report_error("Failed to generate income-expense report");
        }
    };

    let report = build_income_expense_report(periodo, &ingresos, &egresos);

    match render_income_expense(&report, formato) {
        Ok(rendered) => attachment_response(rendered),
        Err(e) => {
            error!(error = %e, "Failed to render income-expense report");
            report_error("Failed to generate income-expense report")
        }
    }
}

/// POST /reports/inventario
#[axum::debug_handler]
async fn generate_inventory_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ReportRequest>,
) -> Response {
    let (periodo, formato) = match request.validate() {
        Ok(validated) => validated,
        Err(response) => return response,
    };

    let repo = InventoryRepository::new((*state.db).clone());
    let productos = match repo
        .product_activity(
            auth_user.user_id(),
            DateWindow::closed(periodo.fecha_inicio, periodo.fecha_fin),
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to query inventory report");
            return report_error("Failed to generate inventory report");
        }
    };

    let report = build_inventory_report(periodo, &productos);

    match render_inventory(&report, formato) {
        Ok(rendered) => attachment_response(rendered),
        Err(e) => {
            error!(error = %e, "Failed to render inventory report");
            report_error("Failed to generate inventory report")
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;
    use uuid::Uuid;

    use gestia_shared::{JwtConfig, JwtService, ReportsConfig};

    use crate::{AppState, create_router};

    /// State over a disconnected database: any query would error, so a
    /// passing test proves validation rejects before store access.
    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expires_minutes: 15,
            })),
            reports: ReportsConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }

    fn report_request(token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/reports/ventas")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn valid_token(state: &AppState) -> String {
        state
            .jwt_service
            .generate_access_token(Uuid::new_v4())
            .unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_request_is_rejected() {
        let app = create_router(test_state());

        let response = app
            .oneshot(report_request(
                None,
                r#"{"fechaInicio":"2024-01-01","fechaFin":"2024-01-31","formato":"pdf"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unsupported_format_is_rejected_without_store_access() {
        let state = test_state();
        let token = valid_token(&state);
        let app = create_router(state);

        let response = app
            .oneshot(report_request(
                Some(&token),
                r#"{"fechaInicio":"2024-01-01","fechaFin":"2024-01-31","formato":"csv"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_date_is_rejected() {
        let state = test_state();
        let token = valid_token(&state);
        let app = create_router(state);

        let response = app
            .oneshot(report_request(
                Some(&token),
                r#"{"fechaFin":"2024-01-31","formato":"pdf"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_date_is_rejected() {
        let state = test_state();
        let token = valid_token(&state);
        let app = create_router(state);

        let response = app
            .oneshot(report_request(
                Some(&token),
                r#"{"fechaInicio":"31/01/2024","fechaFin":"2024-01-31","formato":"pdf"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
