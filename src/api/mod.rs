pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/schools", get(handlers::classes::list_schools))
        .nest("/classes", class_routes(state.clone()))
        .nest("/announcements", announcement_routes(state))
}

fn class_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public: students only read
        .route("/", get(handlers::classes::list_classes))
        .route("/:school/:section/search", get(handlers::classes::search))
        .route("/:school/:section/keywords", get(handlers::classes::keywords))
        .route("/:school/:section/recent", get(handlers::classes::recent))
        .route("/:school/:section/upcoming", get(handlers::classes::upcoming))
        // Teacher's own posts
        .merge(Router::new()
            .route("/:school/:section/mine", get(handlers::classes::mine))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            ))
        )
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::announcements::create))
        .route(
            "/:id",
            put(handlers::announcements::update).delete(handlers::announcements::delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
