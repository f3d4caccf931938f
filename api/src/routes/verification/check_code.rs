use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sv_core::services::VerificationProvider;

use super::AppState;
use crate::dto::{CheckCodeRequest, CheckCodeResponse};
use crate::handlers::{handle_domain_error, missing_field_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /check-code
///
/// # Request Body
///
/// ```json
/// { "request_id": "c11236f4-00bf-4b89-84ba-88b25df97315", "code": "1234" }
/// ```
///
/// # Response
///
/// `200 {"verified": true, "status": "completed"}`. A wrong code is not an
/// error: it answers `200 {"verified": false, "status": "invalid_code"}`.
pub async fn check_code<P>(
    req: HttpRequest,
    state: web::Data<AppState<P>>,
    body: web::Json<CheckCodeRequest>,
) -> HttpResponse
where
    P: VerificationProvider + ?Sized + 'static,
{
    if let Err(errors) = body.validate() {
        tracing::warn!(request_id = %req.request_id(), "Incomplete code check request");
        return missing_field_response(&errors, &CheckCodeRequest::FIELDS);
    }

    let verification_id = body.request_id.as_deref().unwrap_or_default();
    let code = body.code.as_deref().unwrap_or_default();

    match state.verification_service.check_code(verification_id, code).await {
        Ok(outcome) => HttpResponse::Ok().json(CheckCodeResponse {
            verified: outcome.verified,
            status: outcome.provider_status,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
