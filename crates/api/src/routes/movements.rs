//! Movement ledger routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::error_response;
use crate::{AppState, middleware::AuthUser};
use gestia_shared::AppError;
use gestia_core::movements::{
    Movement, MovementFilter, MovementKind, MovementSummary, filter_and_summarize, normalize,
};
use gestia_db::repositories::movements::{DateWindow, MovementRepository};

/// Creates the movement routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/movements", get(get_movements))
}

/// Query parameters for the movement ledger.
#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    /// Kind filter: `Ingreso`, `Egreso`, `Venta`, `Compra`, or `all`.
    pub tipo: Option<String>,
    /// Inclusive lower date bound.
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: Option<NaiveDate>,
    /// Case-insensitive text search.
    pub texto: Option<String>,
}

/// One movement in the response.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Source record ID.
    pub id: Uuid,
    /// Kind label.
    pub tipo: &'static str,
    /// Transaction date.
    pub fecha: NaiveDate,
    /// Amount (always non-negative; sign follows the kind).
    pub monto: Decimal,
    /// Free-text description.
    pub descripcion: Option<String>,
    /// Origin label (category / client / supplier).
    pub origen: String,
    /// Type-specific secondary string.
    pub detalle: Option<String>,
}

/// Movement ledger response.
#[derive(Debug, Serialize)]
pub struct MovementsResponse {
    /// Filtered movements.
    pub movimientos: Vec<MovementResponse>,
    /// Aggregates over the filtered set.
    pub resumen: MovementSummary,
}

fn movement_to_response(movement: &Movement) -> MovementResponse {
    MovementResponse {
        id: movement.id,
        tipo: movement.tipo().label(),
        fecha: movement.fecha,
        monto: movement.monto,
        descripcion: movement.descripcion.clone(),
        origen: movement.origen_label().to_string(),
        detalle: movement.detalle().map(String::from),
    }
}

/// GET /movements
///
/// Returns the unified ledger with filtering and summary cards.
#[axum::debug_handler]
async fn get_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    // Resolve the kind filter before touching the store.
    let tipo = match query.tipo.as_deref() {
        None | Some("all") => None,
        Some(raw) => match raw.parse::<MovementKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                return error_response(&AppError::Validation(
                    "tipo must be one of Ingreso, Egreso, Venta, Compra or all".to_string(),
                ));
            }
        },
    };

    let window = DateWindow {
        desde: query.fecha_desde,
        hasta: query.fecha_hasta,
    };
    let repo = MovementRepository::new((*state.db).clone());

    let sources = match repo.movement_sources(auth_user.user_id(), window).await {
        Ok(sources) => sources,
        Err(e) => {
            error!(error = %e, "Failed to query movements");
            return error_response(&AppError::Database("Failed to load movements".to_string()));
        }
    };

    let filter = MovementFilter {
        tipo,
        fecha_desde: query.fecha_desde,
        fecha_hasta: query.fecha_hasta,
        texto: query.texto,
    };
    let ledger = filter_and_summarize(normalize(sources), &filter);

    let response = MovementsResponse {
        movimientos: ledger.filtered.iter().map(movement_to_response).collect(),
        resumen: ledger.summary,
    };

    (StatusCode::OK, Json(response)).into_response()
}
