pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handlers;

pub use state::AppState;

pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        // Deletion endpoints used by the gallery pages
        .route("/deletephoto", post(handlers::delete::delete_photo))
        .route("/deletetimelapse", post(handlers::delete::delete_timelapse))
        // Read-only listings
        .route("/gallery", get(handlers::gallery::gallery))
        .route("/timelapse-gallery", get(handlers::gallery::timelapse_gallery))
        .route("/timelapse-gallery/view/:timelapse", get(handlers::gallery::timelapse_view))
        // Settings
        .route("/settings", get(handlers::settings::show_settings))
        .route("/saveSettings", post(handlers::settings::save_settings))
        .with_state(state);

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

pub async fn serve(listener: TcpListener, state: AppState, config: &ServerConfig) -> std::io::Result<()> {
    axum::serve(listener, app(state, config)).await
}
