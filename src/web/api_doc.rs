use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::error::ErrorResponse;
use super::api::planes::PlanesResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::planes::get_planes,
        super::api::airports::list_airports,
        super::api::airports::thresholds,
    ),
    components(
        schemas(
            PlanesResponse,
            ErrorResponse,
            crate::aircraft::AircraftState,
            crate::aircraft::ConflictRecord,
            crate::aircraft::AlertLevel,
            crate::aircraft::Category,
            crate::aircraft::Status,
            crate::airport::Airport,
            crate::conflict::ThresholdTable,
            crate::conflict::DistanceBands,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Airprox API",
        description = "Proximity alerts for aircraft around an airport",
        version = "0.1.0"
    ),
    tags(
        (name = "traffic", description = "Assessed traffic snapshots"),
        (name = "reference", description = "Airports and threshold tables")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
