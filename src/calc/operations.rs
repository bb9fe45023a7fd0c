use thiserror::Error;

/// A loosely typed calculator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Float(f64),
    NumericString(String),
    /// Any other input shape (list, object, boolean, null). Never coerces.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Inputs must be numbers or numeric strings")]
    InvalidInput,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Result is out of range")]
    OutOfRange,
}

/// Converts an operand to `f64`. Strings must be a plain float literal
/// (no surrounding whitespace) with a finite value.
pub fn coerce(x: &Operand) -> Result<f64, CalcError> {
    match x {
        Operand::Integer(i) => Ok(*i as f64),
        Operand::Float(f) => Ok(*f),
        Operand::NumericString(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(CalcError::InvalidInput),
        Operand::Unsupported => Err(CalcError::InvalidInput),
    }
}

/// Results must stay finite so they serialize as a JSON number.
fn finite(v: f64) -> Result<f64, CalcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CalcError::OutOfRange)
    }
}

pub fn add(a: &Operand, b: &Operand) -> Result<f64, CalcError> {
    finite(coerce(a)? + coerce(b)?)
}

pub fn subtract(a: &Operand, b: &Operand) -> Result<f64, CalcError> {
    finite(coerce(a)? - coerce(b)?)
}

pub fn multiply(a: &Operand, b: &Operand) -> Result<f64, CalcError> {
    finite(coerce(a)? * coerce(b)?)
}

/// The divisor is checked first, so a zero `b` wins over an invalid `a`.
pub fn divide(a: &Operand, b: &Operand) -> Result<f64, CalcError> {
    let divisor = coerce(b)?;
    if divisor == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    finite(coerce(a)? / divisor)
}
