//! Callable function envelope.
//!
//! Requests arrive as `{"data": ...}` and successful results leave as
//! `{"result": ...}`. Errors are rendered by [`AppError`].

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AppError;

/// The `data` member of a callable request.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableData(pub Value);

impl<S> FromRequest<S> for CallableData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidArgument(format!("unreadable request body: {e}")))?;

        parse_envelope(&body).map(Self)
    }
}

fn parse_envelope(body: &[u8]) -> Result<Value, AppError> {
    let mut envelope: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidArgument(format!("request body is not JSON: {e}")))?;

    envelope
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| AppError::InvalidArgument("request body must contain 'data'".to_string()))
}

/// A successful callable result.
#[derive(Debug, Clone)]
pub struct CallableResult<T>(pub T);

impl<T: Serialize> IntoResponse for CallableResult<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(self.0) {
            Ok(result) => Json(json!({ "result": result })).into_response(),
            Err(e) => AppError::Internal(format!("failed to encode result: {e}")).into_response(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_extracts_data() {
        let data = parse_envelope(br#"{"data": {"storeId": "S1"}}"#).unwrap();
        assert_eq!(data["storeId"], "S1");

        assert_eq!(parse_envelope(br#"{"data": null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_bad_envelopes_are_invalid_argument() {
        let bodies: [&[u8]; 4] = [b"not json", b"", br#"{"storeId": "S1"}"#, b"[1]"];
        for body in bodies {
            let err = parse_envelope(body).unwrap_err();
            assert_eq!(err.status(), "INVALID_ARGUMENT");
        }
    }

    #[tokio::test]
    async fn test_result_envelope() {
        let response = CallableResult(json!({"orderId": "O1"})).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"result": {"orderId": "O1"}}));
    }
}
