//! Pure binary arithmetic used by the calculator endpoints.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot divide by zero!")]
pub struct DivideByZero;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

pub fn divide(a: f64, b: f64) -> Result<f64, DivideByZero> {
    if b == 0.0 {
        return Err(DivideByZero);
    }
    Ok(a / b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_cases() {
        assert_eq!(add(1.0, 2.0), 3.0);
        assert_eq!(add(2.5, 3.5), 6.0);
        assert_eq!(add(-1.0, 1.0), 0.0);
        assert_eq!(add(0.0, 0.0), 0.0);
        assert_eq!(add(100.0, 200.0), 300.0);
    }

    #[test]
    fn subtract_cases() {
        assert_eq!(subtract(5.0, 3.0), 2.0);
        assert_eq!(subtract(10.5, 2.5), 8.0);
        assert_eq!(subtract(0.0, 0.0), 0.0);
        assert_eq!(subtract(1.0, 2.0), -1.0);
    }

    #[test]
    fn multiply_cases() {
        assert_eq!(multiply(2.0, 3.0), 6.0);
        assert_eq!(multiply(1.5, 2.0), 3.0);
        assert_eq!(multiply(0.0, 5.0), 0.0);
        assert_eq!(multiply(10.0, 0.0), 0.0);
    }

    #[test]
    fn divide_cases() {
        assert_eq!(divide(6.0, 3.0).unwrap(), 2.0);
        assert_eq!(divide(7.5, 2.5).unwrap(), 3.0);
        assert_eq!(divide(0.0, 1.0).unwrap(), 0.0);
        assert_eq!(divide(1.0, 2.0).unwrap(), 0.5);
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        let err = divide(10.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide by zero!");
    }
}
