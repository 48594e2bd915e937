use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use invoices_types::domain::invoice::{InvalidInvoiceId, MissingFields};
use invoices_types::ports::invoice_repository::RepoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] MissingFields),

    #[error(transparent)]
    InvalidId(#[from] InvalidInvoiceId),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::InvalidId(id) => AppError::InvalidId(id),
            RepoError::DbError(m) => AppError::Store(anyhow::anyhow!(m)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidId,
    InvalidBody,
    Store,
}

/// The `error` member of a failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    /// Missing attributes, for `validation` failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::InvalidId(_) => ErrorKind::InvalidId,
            AppError::InvalidBody(_) => ErrorKind::InvalidBody,
            AppError::Store(_) => ErrorKind::Store,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let fields = match self {
            AppError::Validation(m) => Some(m.missing.iter().map(|f| f.to_string()).collect()),
            _ => None,
        };
        ErrorDetail {
            kind: self.kind(),
            message: self.to_string(),
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = "Error in creating invoice")]
    pub message: String,
    pub error: ErrorDetail,
}

/// A handler failure: every kind is reported as 500 with the handler's
/// message and the error detail embedded.
#[derive(Debug)]
pub struct Failure {
    pub message: &'static str,
    pub error: AppError,
}

impl Failure {
    pub fn new(message: &'static str, error: impl Into<AppError>) -> Self {
        Self {
            message,
            error: error.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        tracing::error!(kind = ?self.error.kind(), error = %self.error, "{}", self.message);
        let body = ErrorEnvelope {
            message: self.message.to_string(),
            error: self.error.detail(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_detail_lists_fields() {
        let err = AppError::from(MissingFields {
            missing: vec!["clientName"],
        });
        let detail = err.detail();
        assert_eq!(detail.kind, ErrorKind::Validation);
        assert_eq!(detail.fields, Some(vec!["clientName".to_string()]));

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "validation");
    }

    #[test]
    fn repo_errors_map_to_kinds() {
        let invalid: AppError = RepoError::InvalidId(InvalidInvoiceId {
            raw: "x".into(),
            reason: "bad".into(),
        })
        .into();
        assert_eq!(invalid.kind(), ErrorKind::InvalidId);

        let store: AppError = RepoError::DbError("connection reset".into()).into();
        assert_eq!(store.kind(), ErrorKind::Store);
        assert!(store.to_string().contains("connection reset"));
        assert!(serde_json::to_value(store.detail()).unwrap()["fields"].is_null());
    }

    #[test]
    fn failure_is_a_500() {
        let res = Failure::new("Error in creating invoice", AppError::InvalidBody("eof".into()))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
