mod create;
mod list;

pub use create::*;
pub use list::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::db::AppState;
use crate::middleware::require_admin_token;

/// Admin routes, all gated on `X-Admin-Token`.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/create", post(create_serial))
        .route("/api/serials", get(list_serials))
        .route_layer(middleware::from_fn_with_state(
            state.admin_token.clone(),
            require_admin_token,
        ))
}
