//! Booking API 模块
//!
//! 五个状态操作 (check-in / check-out / cancel / no-show / delete≈cancel)
//! 全部走 BookingEngine 命令，普通字段更新永不触发状态副作用。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/check-in", post(handler::check_in))
        .route("/{id}/check-out", post(handler::check_out))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/no-show", post(handler::no_show))
}
