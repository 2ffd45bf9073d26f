use serde::{Deserialize, Serialize};

/// Request body shared by the four binary operation endpoints.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub result: f64,
}
