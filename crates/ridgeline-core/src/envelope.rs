use serde::{Deserialize, Serialize};

use crate::error::RidgelineError;

/// Response body for front-ends serving parse results.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "<stage code>", "detail": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            error: None,
            detail: None,
        }
    }

    pub fn failure(err: &RidgelineError) -> Self {
        Envelope {
            success: false,
            data: None,
            error: Some(err.code().to_string()),
            detail: Some(err.to_string()),
        }
    }

    /// HTTP status a front-end should answer with.
    pub fn status(&self) -> u16 {
        if self.success {
            200
        } else {
            500
        }
    }
}

impl<T> From<Result<T, RidgelineError>> for Envelope<T> {
    fn from(result: Result<T, RidgelineError>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let env = Envelope::ok(json!({"total": 1}));
        assert_eq!(env.status(), 200);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"success": true, "data": {"total": 1}})
        );
    }

    #[test]
    fn test_failure_shape() {
        let result: Result<u32, RidgelineError> = Err(RidgelineError::NoText {
            stage: "text extraction",
        });
        let env = Envelope::from(result);
        assert_eq!(env.status(), 500);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "success": false,
                "error": "parse_failed",
                "detail": "no text content found in document during text extraction"
            })
        );
    }
}
