//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{auth_middleware, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the application router with all routes, docs and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Request ID (outermost) generates or propagates `x-request-id`
/// 2. Logging records each request with its id
/// 3. Compression and CORS
///
/// `/api/me` additionally runs `auth_middleware`.
///
/// # Routes
/// - `/api/health` - Health checks
/// - `/api/users` - Profiles and caregiver search
/// - `/api/me` - Authenticated caller
/// - `/swagger-ui` - Swagger UI over `/api-docs/openapi.json`
pub fn create_router(state: AppState) -> Router {
    let me_routes = handlers::me::me_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let api_routes = OpenApiRouter::new()
        .merge(handlers::health::health_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/me", me_routes);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
