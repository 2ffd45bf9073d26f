//! Calculation kinds and their computation rules.
//!
//! The persisted `type` tag resolves to one of four closed variants; the
//! computation is re-derived from the stored inputs on every read rather than
//! cached in the `result` column.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("Inputs must be a list of numbers.")]
    NotANumberList,
    #[error("Inputs must be a list with at least two numbers.")]
    TooFewInputs,
    #[error("Cannot divide by zero.")]
    DivisionByZero,
    #[error("Unsupported calculation type: {0}")]
    UnsupportedType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl CalculationKind {
    /// Resolve a type tag, case-insensitively, to its variant.
    pub fn parse(tag: &str) -> Result<Self, CalcError> {
        match tag.to_lowercase().as_str() {
            "addition" => Ok(Self::Addition),
            "subtraction" => Ok(Self::Subtraction),
            "multiplication" => Ok(Self::Multiplication),
            "division" => Ok(Self::Division),
            _ => Err(CalcError::UnsupportedType(tag.to_string())),
        }
    }

    /// Canonical lowercase tag, the form stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
        }
    }

    /// Apply this kind's rule to the stored inputs.
    pub fn compute(&self, inputs: &Value) -> Result<f64, CalcError> {
        let inputs = parse_inputs(inputs)?;
        match self {
            Self::Addition => Ok(inputs.iter().sum()),
            Self::Subtraction => Ok(inputs[1..].iter().fold(inputs[0], |acc, v| acc - v)),
            Self::Multiplication => Ok(inputs.iter().product()),
            Self::Division => inputs[1..].iter().try_fold(inputs[0], |acc, v| {
                if *v == 0.0 {
                    Err(CalcError::DivisionByZero)
                } else {
                    Ok(acc / v)
                }
            }),
        }
    }
}

impl std::fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs must be a JSON array of at least two numbers, uniformly for all
/// four kinds.
fn parse_inputs(value: &Value) -> Result<Vec<f64>, CalcError> {
    let items = value.as_array().ok_or(CalcError::NotANumberList)?;
    if items.len() < 2 {
        return Err(CalcError::TooFewInputs);
    }
    items
        .iter()
        .map(|v| v.as_f64().ok_or(CalcError::NotANumberList))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_any_casing() {
        assert_eq!(
            CalculationKind::parse("Addition").unwrap(),
            CalculationKind::Addition
        );
        assert_eq!(
            CalculationKind::parse("SUBTRACTION").unwrap(),
            CalculationKind::Subtraction
        );
        assert_eq!(
            CalculationKind::parse("multiplication").unwrap(),
            CalculationKind::Multiplication
        );
        assert_eq!(
            CalculationKind::parse("DiViSiOn").unwrap(),
            CalculationKind::Division
        );
    }

    #[test]
    fn parse_rejects_unknown_tags() {
        let err = CalculationKind::parse("power").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported calculation type: power");
        assert!(CalculationKind::parse("").is_err());
        assert!(CalculationKind::parse("add").is_err());
    }

    #[test]
    fn addition_sums_all_inputs() {
        let kind = CalculationKind::Addition;
        assert_eq!(kind.compute(&json!([1, 2, 3])).unwrap(), 6.0);
        assert_eq!(kind.compute(&json!([1.5, 2.5])).unwrap(), 4.0);
        assert_eq!(kind.compute(&json!([-1, 1])).unwrap(), 0.0);
    }

    #[test]
    fn subtraction_is_a_left_fold() {
        let kind = CalculationKind::Subtraction;
        assert_eq!(kind.compute(&json!([10, 3, 2])).unwrap(), 5.0);
        // not commutative
        assert_eq!(kind.compute(&json!([2, 3, 10])).unwrap(), -11.0);
    }

    #[test]
    fn multiplication_seeds_at_one() {
        let kind = CalculationKind::Multiplication;
        assert_eq!(kind.compute(&json!([2, 3, 4])).unwrap(), 24.0);
        assert_eq!(kind.compute(&json!([5, 0])).unwrap(), 0.0);
    }

    #[test]
    fn division_folds_left() {
        let kind = CalculationKind::Division;
        assert_eq!(kind.compute(&json!([100, 5, 2])).unwrap(), 10.0);
        assert_eq!(kind.compute(&json!([1, 2])).unwrap(), 0.5);
    }

    #[test]
    fn division_rejects_zero_divisors_only() {
        let kind = CalculationKind::Division;
        let err = kind.compute(&json!([10, 0])).unwrap_err();
        assert_eq!(err, CalcError::DivisionByZero);
        assert_eq!(err.to_string(), "Cannot divide by zero.");
        assert_eq!(kind.compute(&json!([10, 2, 0])).unwrap_err(), CalcError::DivisionByZero);
        // zero in the leading position is fine
        assert_eq!(kind.compute(&json!([0, 5])).unwrap(), 0.0);
    }

    #[test]
    fn all_kinds_reject_short_inputs() {
        for kind in [
            CalculationKind::Addition,
            CalculationKind::Subtraction,
            CalculationKind::Multiplication,
            CalculationKind::Division,
        ] {
            assert_eq!(kind.compute(&json!([])).unwrap_err(), CalcError::TooFewInputs);
            assert_eq!(kind.compute(&json!([1])).unwrap_err(), CalcError::TooFewInputs);
        }
    }

    #[test]
    fn all_kinds_reject_non_lists_and_non_numbers() {
        for kind in [
            CalculationKind::Addition,
            CalculationKind::Subtraction,
            CalculationKind::Multiplication,
            CalculationKind::Division,
        ] {
            assert_eq!(
                kind.compute(&json!("1,2,3")).unwrap_err(),
                CalcError::NotANumberList
            );
            assert_eq!(
                kind.compute(&json!([1, "two", 3])).unwrap_err(),
                CalcError::NotANumberList
            );
        }
    }

    #[test]
    fn kind_serializes_as_lowercase_tag() {
        assert_eq!(
            serde_json::to_string(&CalculationKind::Addition).unwrap(),
            r#""addition""#
        );
        assert_eq!(CalculationKind::Division.to_string(), "division");
    }
}
