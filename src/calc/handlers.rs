use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    calc::{
        dto::{CalcResponse, OperandsRequest},
        operations::{self, CalcError, Operand},
    },
    error::ApiError,
    state::AppState,
};

type BinaryOp = fn(&Operand, &Operand) -> Result<f64, CalcError>;

pub fn calc_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/subtract", post(subtract))
        .route("/multiply", post(multiply))
        .route("/divide", post(divide))
}

fn evaluate(
    name: &'static str,
    op: BinaryOp,
    payload: Result<Json<OperandsRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    let Json(OperandsRequest { a, b }) = payload?;
    match op(&Operand::from(&a), &Operand::from(&b)) {
        Ok(result) => {
            info!(op = name, %a, %b, result, "calculated");
            Ok(Json(CalcResponse { result }))
        }
        Err(e) => {
            warn!(op = name, %a, %b, error = %e, "calculation failed");
            Err(e.into())
        }
    }
}

#[instrument(skip(payload))]
pub async fn add(
    payload: Result<Json<OperandsRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    evaluate("add", operations::add, payload)
}

#[instrument(skip(payload))]
pub async fn subtract(
    payload: Result<Json<OperandsRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    evaluate("subtract", operations::subtract, payload)
}

#[instrument(skip(payload))]
pub async fn multiply(
    payload: Result<Json<OperandsRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    evaluate("multiply", operations::multiply, payload)
}

#[instrument(skip(payload))]
pub async fn divide(
    payload: Result<Json<OperandsRequest>, JsonRejection>,
) -> Result<Json<CalcResponse>, ApiError> {
    evaluate("divide", operations::divide, payload)
}
