use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{clear_app_cache, create_admin_user, list_users, run_sentiment_digest},
        entries::{create_entry, delete_entry, get_entry, list_entries, update_entry},
        health::{healthz, livez},
        users::{delete_account, greeting, send_mail, sign_up, update_profile},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Account routes
        .route("/users", post(sign_up))
        .route("/users/{username}", put(update_profile).delete(delete_account))
        .route("/users/{username}/send-email", post(send_mail))
        .route("/users/{username}/greeting/{city}", get(greeting))
        // Entry routes
        .route(
            "/users/{username}/entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/users/{username}/entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        // Admin routes
        .route("/admin/users", get(list_users))
        .route("/admin/create-admin-user", post(create_admin_user))
        .route("/admin/clear-app-cache", post(clear_app_cache))
        .route("/admin/sentiment-digest", post(run_sentiment_digest))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
