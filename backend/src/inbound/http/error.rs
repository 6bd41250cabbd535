//! HTTP mapping for domain errors.
//!
//! The domain [`Error`] stays transport-agnostic; this module gives it a status
//! code, the `Trace-Id` header and a redacted body for internal failures. It
//! also turns actix extractor rejections (malformed JSON, bad query strings)
//! into `invalid_request` errors with the same body shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Largest JSON body accepted by any endpoint.
pub const JSON_LIMIT_BYTES: usize = 64 * 1024;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(trace_id = self.trace_id(), error = self.message(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn json_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            Error::invalid_request(format!("request body exceeds {JSON_LIMIT_BYTES} bytes"))
        }
        JsonPayloadError::ContentType => {
            Error::invalid_request("request body must be application/json")
        }
        JsonPayloadError::Deserialize(inner) => {
            Error::invalid_request("request body is not valid").with_details(json!({
                "code": "invalid_json",
                "reason": inner.to_string(),
            }))
        }
        other => Error::invalid_request(format!("request body could not be read: {other}")),
    }
}

/// `JsonConfig` that answers malformed bodies with the standard error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, req: &HttpRequest| {
            warn!(path = req.path(), error = %err, "rejected JSON body");
            json_error(&err).into()
        })
}

/// `QueryConfig` that answers bad query strings with the standard error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req: &HttpRequest| {
        warn!(path = req.path(), error = %err, "rejected query string");
        let QueryPayloadError::Deserialize(inner) = &err else {
            return Error::invalid_request("query string is not valid").into();
        };
        Error::invalid_request("query string is not valid")
            .with_details(json!({ "code": "invalid_query", "reason": inner.to_string() }))
            .into()
    })
}

/// `PathConfig` so unparsable path segments surface as 400 rather than 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        Error::invalid_request(format!("path is not valid: {err}")).into()
    })
}
