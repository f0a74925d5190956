use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/rooms",
            get(handlers::room::list_rooms).post(handlers::room::create_room),
        )
        .route(
            "/api/rooms/:link_code",
            get(handlers::room::get_room)
                .put(handlers::room::update_room)
                .delete(handlers::room::delete_room),
        )
        .route("/api/rooms/:link_code/join", post(handlers::room::join_room))
        .route("/api/rooms/:link_code/leave", post(handlers::room::leave_room))
        .route("/api/rooms/:link_code/close", post(handlers::room::close_room))
        .route(
            "/api/rooms/:link_code/participants/:participant_id",
            delete(handlers::room::remove_participant),
        )
}
