use axum::{extract::State, Json};

use crate::airport::Airport;
use crate::conflict::ThresholdTable;
use crate::web::api::error::ApiResult;
use crate::web::auth::Caller;
use crate::web::server::AppState;
use crate::web::config::Permission;

#[utoipa::path(
    get,
    path = "/api/airports",
    tag = "reference",
    responses(
        (status = 200, description = "Configured airports", body = Vec<Airport>),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn list_airports(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<Airport>>> {
    caller.require(Permission::ViewTraffic)?;
    Ok(Json(state.config.airports.clone()))
}

#[utoipa::path(
    get,
    path = "/api/thresholds",
    tag = "reference",
    responses(
        (status = 200, description = "Distance bands per pairing category", body = ThresholdTable),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn thresholds(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<ThresholdTable>> {
    caller.require(Permission::ViewTraffic)?;
    Ok(Json(*state.cache.thresholds()))
}
