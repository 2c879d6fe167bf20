// server/src/envelope.rs

//! The JSON shapes every endpoint answers with.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
  pub status: u16,
  pub message: String,
  pub data: T,
}

/// `200 OK` with `{status: 200, message, data}`.
pub fn success<T: Serialize>(message: &str, data: T) -> HttpResponse {
  HttpResponse::Ok().json(SuccessEnvelope {
    status: StatusCode::OK.as_u16(),
    message: message.to_string(),
    data,
  })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
  pub message: String,
  pub timestamp: DateTime<Utc>,
  pub status: u16,
  pub error_details: String,
  pub error_code: String,
  pub path: String,
}

impl ErrorEnvelope {
  /// `message` is the canonical phrase for `status`; `timestamp` is taken now.
  pub fn new(status: StatusCode, details: &str, path: &str) -> Self {
    Self {
      message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
      timestamp: Utc::now(),
      status: status.as_u16(),
      error_details: details.to_string(),
      error_code: format!("E{}", status.as_u16()),
      path: path.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_envelope_uses_status_derived_code_and_message() {
    let env = ErrorEnvelope::new(StatusCode::CONFLICT, "Email already in use", "/api/users");
    assert_eq!(env.status, 409);
    assert_eq!(env.error_code, "E409");
    assert_eq!(env.message, "Conflict");
    assert_eq!(env.error_details, "Email already in use");
    assert_eq!(env.path, "/api/users");
  }

  #[test]
  fn error_envelope_serializes_camel_case_with_iso_timestamp() {
    let env = ErrorEnvelope::new(StatusCode::NOT_FOUND, "Order not found", "/api/orders/9");
    let json = serde_json::to_value(&env).unwrap();

    assert_eq!(json["errorCode"], "E404");
    assert_eq!(json["errorDetails"], "Order not found");
    let ts = json["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(ts).is_ok());
  }

  #[test]
  fn success_envelope_shape() {
    let env = SuccessEnvelope {
      status: 200,
      message: "Order created".to_string(),
      data: serde_json::json!({"status": "success"}),
    };
    let json = serde_json::to_value(&env).unwrap();
    assert_eq!(json, serde_json::json!({"status": 200, "message": "Order created", "data": {"status": "success"}}));
  }
}
