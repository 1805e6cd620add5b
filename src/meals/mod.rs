pub mod dto;
pub mod filters;
pub mod format;
pub mod handlers;
pub mod model;
pub mod normalize;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
