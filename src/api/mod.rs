mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::Store;

pub fn create_router(store: Store) -> Router {
    let api = Router::new()
        // Tasks
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/{id}", put(handlers::update_task))
        .route("/tasks/{id}", delete(handlers::delete_task))
        // Notification preferences
        .route("/preferences", get(handlers::get_preference))
        .route("/preferences", put(handlers::set_preference))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
