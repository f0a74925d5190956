use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/rooms", get(handlers::admin::list_rooms))
        .route(
            "/api/admin/rooms/:id",
            put(handlers::admin::update_room).delete(handlers::admin::delete_room),
        )
        .route(
            "/api/admin/rooms/:id/participants",
            get(handlers::admin::room_participants_list),
        )
        .route(
            "/api/admin/rooms/:id/participants/:participant_id",
            put(handlers::admin::update_participant).delete(handlers::admin::delete_participant),
        )
        .route("/api/admin/statistics", get(handlers::admin::statistics))
}
