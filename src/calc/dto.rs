use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calc::operations::Operand;

/// Request body shared by the four operation endpoints. Operands stay raw
/// JSON so that a wrong type fails coercion like any other bad input.
#[derive(Debug, Deserialize)]
pub struct OperandsRequest {
    pub a: Value,
    pub b: Value,
}

#[derive(Debug, Serialize)]
pub struct CalcResponse {
    pub result: f64,
}

impl From<&Value> for Operand {
    fn from(v: &Value) -> Self {
        match v {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Operand::Integer(i),
                (None, Some(f)) => Operand::Float(f),
                (None, None) => Operand::Unsupported,
            },
            Value::String(s) => Operand::NumericString(s.clone()),
            _ => Operand::Unsupported,
        }
    }
}
