//! API-facing signature capture types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::PropertyId;

/// A single point of a signature stroke, in surface coordinates.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct SignaturePoint {
    pub x: f32,
    pub y: f32,
}

/// Request body for submitting a signature: an ordered list of strokes,
/// each an ordered list of points.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignatureSubmit {
    pub strokes: Vec<Vec<SignaturePoint>>,
}

/// A rendered signature as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignatureResponse {
    #[schema(value_type = String, format = "uuid")]
    pub property_id: PropertyId,
    /// PNG image as a `data:image/png;base64,` URL.
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_deserialization() {
        let body = serde_json::json!({
            "strokes": [[{"x": 10.0, "y": 20.0}, {"x": 15.0, "y": 25.0}]]
        });
        let req: SignatureSubmit = serde_json::from_value(body).unwrap();
        assert_eq!(req.strokes.len(), 1);
        assert_eq!(req.strokes[0].len(), 2);
        assert_eq!(req.strokes[0][1].x, 15.0);
    }
}
