use std::fmt;

pub const ADD: &str = "add";
pub const DIVIDE: &str = "divide";
pub const SUM: &str = "sum";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    DivideByZero,
    Overflow,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivideByZero => f.write_str("division by zero"),
            MathError::Overflow => f.write_str("integer overflow"),
        }
    }
}

impl std::error::Error for MathError {}

pub async fn add(a: i64, b: i64) -> Result<i64, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub async fn divide(a: i64, b: i64) -> Result<i64, MathError> {
    if b == 0 {
        return Err(MathError::DivideByZero);
    }
    // i64::MIN / -1 is the only other failing case
    a.checked_div(b).ok_or(MathError::Overflow)
}

/// Sums an optional list; a null list sums to zero.
pub async fn sum(values: Option<Vec<f64>>) -> f64 {
    values.unwrap_or_default().iter().sum()
}
