use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/courts",
            get(handlers::court::list_courts).post(handlers::court::create_court),
        )
        .route(
            "/api/courts/:id",
            get(handlers::court::get_court)
                .put(handlers::court::update_court)
                .delete(handlers::court::delete_court),
        )
        .route(
            "/api/courts/:id/availability",
            get(handlers::court::court_availability),
        )
}
