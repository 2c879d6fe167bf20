// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use flow::FlowError;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Insufficient Stock: {0}")]
  InsufficientStock(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Migrate(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Expected business-rule failures carry their own message to the client;
  /// everything else is reported generically.
  pub fn client_detail(&self) -> Option<&str> {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::InsufficientStock(m) | AppError::Conflict(m) => {
        Some(m.as_str())
      }
      _ => None,
    }
  }
}

/// An `AppError` tied to the request that produced it, ready to become an error envelope.
#[derive(Debug, Error)]
#[error("{source} (path: {path})")]
pub struct ApiError {
  #[source]
  pub source: AppError,
  pub path: String,
  /// Detail shown instead of the raw error when `source` is an internal failure.
  pub failure: &'static str,
}

impl ApiError {
  pub fn new(source: AppError, req: &HttpRequest, failure: &'static str) -> Self {
    Self {
      source,
      path: req.uri().to_string(),
      failure,
    }
  }

  pub fn envelope(&self) -> ErrorEnvelope {
    let details = self.source.client_detail().unwrap_or(self.failure);
    ErrorEnvelope::new(self.source.status_code(), details, &self.path)
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    self.source.status_code()
  }

  fn error_response(&self) -> HttpResponse {
    if self.source.client_detail().is_none() {
      tracing::error!(application_error = %self.source, path = %self.path, "Responding with internal error");
    } else {
      tracing::info!(application_error = %self.source, path = %self.path, "Responding with business error");
    }
    HttpResponse::build(self.status_code()).json(self.envelope())
  }
}

/// Attaches the request (and a generic failure detail) to a handler result.
pub trait ForRequest<T> {
  fn for_request(self, req: &HttpRequest, failure: &'static str) -> Result<T, ApiError>;
}

impl<T> ForRequest<T> for Result<T, AppError> {
  fn for_request(self, req: &HttpRequest, failure: &'static str) -> Result<T, ApiError> {
    self.map_err(|e| ApiError::new(e, req, failure))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
