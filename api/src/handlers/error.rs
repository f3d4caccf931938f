//! Conversion of domain and request errors into HTTP responses
//!
//! Every error body is an [`ErrorResponse`]: `{error, code, details?, timestamp}`.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use validator::ValidationErrors;

use sv_core::errors::{DomainError, ProviderError, ValidationError};
use sv_shared::{error_codes, ErrorResponse};

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Validation failures are the caller's fault (400). Provider failures are
/// reported as 500 with the provider's own message in `error`.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation(validation) => handle_validation_error(validation),
        DomainError::Provider(provider) => handle_provider_error(provider),
    }
}

fn handle_validation_error(error: &ValidationError) -> HttpResponse {
    let code = match error {
        ValidationError::RequiredField { .. } => error_codes::MISSING_FIELD,
        ValidationError::InvalidFormat { .. } => error_codes::INVALID_FORMAT,
    };

    HttpResponse::BadRequest()
        .json(ErrorResponse::new(code, error.to_string()).add_detail("field", error.field()))
}

fn handle_provider_error(error: &ProviderError) -> HttpResponse {
    let response = match error {
        ProviderError::Rejected { status, message } => {
            ErrorResponse::new(error_codes::PROVIDER_ERROR, message.as_str())
                .add_detail("provider_status", status)
        }
        ProviderError::Unreachable { .. } => {
            ErrorResponse::new(error_codes::PROVIDER_UNREACHABLE, error.to_string())
        }
        ProviderError::InvalidResponse { .. } => {
            ErrorResponse::new(error_codes::PROVIDER_ERROR, error.to_string())
        }
    };

    HttpResponse::InternalServerError().json(response)
}

/// 400 for the first missing field of a validated request body
///
/// `fields` lists the body's fields in the order they should be reported.
pub fn missing_field_response(errors: &ValidationErrors, fields: &[&str]) -> HttpResponse {
    let failed = errors.field_errors();
    let field = fields
        .iter()
        .find(|field| failed.contains_key(**field))
        .copied()
        .or_else(|| failed.keys().next().map(|key| key.as_ref()))
        .unwrap_or("body");

    handle_validation_error(&ValidationError::required(field))
}

/// Turn unparseable JSON bodies into the standard 400 error body
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");

    let response = match &err {
        JsonPayloadError::ContentType => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::BAD_REQUEST,
            "Content-Type must be application/json",
        )),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            HttpResponse::BadRequest().json(ErrorResponse::new(
                error_codes::BAD_REQUEST,
                "Request body is too large",
            ))
        }
        _ => handle_validation_error(&ValidationError::invalid_format("body")),
    };

    InternalError::from_response(err, response).into()
}

/// Default 404 handler
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        format!("No route for {} {}", req.method(), req.path()),
    ))
}
