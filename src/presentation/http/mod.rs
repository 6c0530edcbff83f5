pub mod endpoints;
pub mod mappers;
pub mod requests;
pub mod responses;
pub mod security;

use std::sync::Arc;

use poem::{Endpoint, EndpointExt, Route, middleware::Cors};
use poem_openapi::OpenApiService;

use crate::presentation::http::endpoints::{
    batch::BatchEndpoints, health::HealthEndpoints, root::ApiState,
    schedules::SchedulesEndpoints, users::UsersEndpoints,
};

/// Assembles the API under `/api` with the swagger UI at the root. The
/// permissive CORS layer also answers browser preflight requests for the
/// batch endpoint.
pub fn build_app(state: Arc<ApiState>, server_url: &str) -> impl Endpoint + use<> {
    let api_service = OpenApiService::new(
        (
            HealthEndpoints,
            SchedulesEndpoints::new(state.clone()),
            UsersEndpoints::new(state.clone()),
            BatchEndpoints::new(state),
        ),
        "Sage Scheduler API",
        "0.1.0",
    )
    .server(format!("{server_url}/api"));
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/", ui)
        .with(Cors::new())
}
