//! FlatFinder backend: a property-rental listing API.
//!
//! Landlords post flat listings with an image and contact details, tenants
//! browse and filter available listings, and everyone manages their own
//! account over a cookie-session API.

pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use state::AppState;

/// Request bodies are dominated by image uploads; leave headroom over the
/// stored-image cap for multipart framing and the text fields.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health))
        // Auth
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/profile", get(routes::auth::profile))
        .route("/delete_account", delete(routes::auth::delete_account))
        // Listings (landlord)
        .route("/landlord", post(routes::listings::create_flat))
        .route("/myflats", get(routes::listings::list_my_flats))
        .route("/myflats/{flat_id}", put(routes::listings::update_flat))
        .route("/myflats/{flat_id}", delete(routes::listings::delete_flat))
        // Discovery (tenant)
        .route(
            "/tenant",
            get(routes::search::search_flats).post(routes::search::search_flats),
        )
        // Uploads
        .route("/static/uploads/{filename}", get(routes::uploads::serve_upload))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// CORS for the single configured browser origin, with credentials so the
/// session cookie travels.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let origin: HeaderValue = origin.parse().expect("Invalid CORS origin");
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
