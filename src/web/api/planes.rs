use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::aircraft::AircraftState;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::auth::Caller;
use crate::web::server::AppState;
use crate::web::config::Permission;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlanesQuery {
    /// Airport code, the configured default when omitted
    pub airport: Option<String>,
    /// `1`, `true` or `yes` to bypass the cache
    pub force: Option<String>,
}

impl PlanesQuery {
    fn force_refresh(&self) -> bool {
        matches!(
            self.force.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanesResponse {
    pub airport: String,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
    pub aircraft: Vec<AircraftState>,
}

#[utoipa::path(
    get,
    path = "/api/planes",
    tag = "traffic",
    params(PlanesQuery),
    responses(
        (status = 200, description = "Assessed traffic around the airport", body = PlanesResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Unknown airport", body = crate::web::api::error::ErrorResponse),
        (status = 502, description = "Fetch failed and nothing cached", body = crate::web::api::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_planes(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<PlanesQuery>,
) -> ApiResult<Json<PlanesResponse>> {
    caller.require(Permission::ViewTraffic)?;

    let force = query.force_refresh();
    if force {
        caller.require(Permission::ForceRefresh)?;
    }

    let code = query
        .airport
        .as_deref()
        .unwrap_or(&state.config.default_airport)
        .to_ascii_uppercase();
    let airport = state
        .config
        .find_airport(&code)
        .ok_or_else(|| ApiError::AirportNotFound(code.clone()))?;

    let snapshot = state.cache.get(airport, force).await?;

    Ok(Json(PlanesResponse {
        airport: snapshot.airport,
        fetched_at: snapshot.fetched_at,
        stale: snapshot.stale,
        aircraft: snapshot.aircraft.as_ref().clone(),
    }))
}
