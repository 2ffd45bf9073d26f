use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calculations::engine::CalculationKind;
use crate::calculations::repo_types::Calculation;

#[derive(Debug, Deserialize)]
pub struct CreateCalculationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub inputs: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCalculationRequest {
    pub inputs: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub inputs: serde_json::Value,
    pub result: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Calculation> for CalculationResponse {
    fn from(row: Calculation) -> Self {
        let result = CalculationKind::parse(&row.kind)
            .ok()
            .and_then(|kind| kind.compute(&row.inputs).ok());
        Self {
            id: row.id,
            kind: row.kind,
            inputs: row.inputs,
            result,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn row(kind: &str, inputs: serde_json::Value) -> Calculation {
        Calculation {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: kind.into(),
            inputs,
            result: None,
            created_at: datetime!(2025-01-01 00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00 UTC),
        }
    }

    #[test]
    fn response_recomputes_result_from_inputs() {
        let resp = CalculationResponse::from(row("addition", json!([1, 2, 3])));
        assert_eq!(resp.result, Some(6.0));
    }

    #[test]
    fn response_carries_none_when_uncomputable() {
        let resp = CalculationResponse::from(row("division", json!([1, 0])));
        assert_eq!(resp.result, None);
    }

    #[test]
    fn create_request_takes_type_and_inputs() {
        let req: CreateCalculationRequest =
            serde_json::from_str(r#"{"type": "Division", "inputs": [10, 2]}"#).unwrap();
        assert_eq!(req.kind, "Division");
        assert_eq!(req.inputs, json!([10, 2]));
    }
}
