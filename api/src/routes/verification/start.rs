use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sv_core::services::VerificationProvider;
use sv_shared::phone::mask_phone_number;

use super::AppState;
use crate::dto::{StartVerificationRequest, StartVerificationResponse};
use crate::handlers::{handle_domain_error, missing_field_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /verification
///
/// Opens a provider request running silent auth with SMS fallback.
///
/// # Request Body
///
/// ```json
/// { "phone": "+15551234567" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "request_id": "c11236f4-00bf-4b89-84ba-88b25df97315",
///     "check_url": "https://api.nexmo.com/v2/verify/c11236f4-.../silent-auth/redirect"
/// }
/// ```
///
/// `check_url` is omitted when the silent-auth channel is not active.
///
/// ## Errors
/// - 400 when `phone` is missing or blank
/// - 500 with the provider's message when the provider refuses the request
pub async fn start_verification<P>(
    req: HttpRequest,
    state: web::Data<AppState<P>>,
    body: web::Json<StartVerificationRequest>,
) -> HttpResponse
where
    P: VerificationProvider + ?Sized + 'static,
{
    let request_id = req.request_id();

    if let Err(errors) = body.validate() {
        tracing::warn!(request_id = %request_id, "Verification request without phone");
        return missing_field_response(&errors, &["phone"]);
    }

    let phone = body.phone.as_deref().unwrap_or_default();
    tracing::info!(
        request_id = %request_id,
        phone = %mask_phone_number(phone),
        "Received verification request"
    );

    match state.verification_service.start(phone).await {
        Ok(verification) => HttpResponse::Ok().json(StartVerificationResponse {
            request_id: verification.request_id.into_inner(),
            check_url: verification.check_url,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
