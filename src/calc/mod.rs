use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod operations;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::calc_routes())
}
