use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Calculation record as stored. `result` stays nullable and is never filled
/// in by the engine; responses recompute it from `inputs`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Calculation {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub inputs: serde_json::Value,
    pub result: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
