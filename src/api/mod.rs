//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::ListingError;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

/// Builds the servable application: every route plus tracing, CORS, and a
/// per-request timeout, bound to `state`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    with_timeout(build_router(), request_timeout)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bounds every request by `request_timeout`. An elapsed request is
/// answered with [`ListingError::Timeout`] in the usual error shape.
fn with_timeout<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(middleware_error))
            .timeout(request_timeout),
    )
}

async fn middleware_error(err: BoxError) -> ListingError {
    if err.is::<Elapsed>() {
        ListingError::Timeout
    } else {
        ListingError::Internal(err.to_string())
    }
}
