use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sv_core::services::VerificationProvider;

use super::AppState;
use crate::dto::NextWorkflowRequest;
use crate::handlers::{handle_domain_error, missing_field_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /next
///
/// Body `{"requestId": "..."}`; answers 200 with an empty body once the
/// provider has moved on to the next channel.
pub async fn next_workflow<P>(
    req: HttpRequest,
    state: web::Data<AppState<P>>,
    body: web::Json<NextWorkflowRequest>,
) -> HttpResponse
where
    P: VerificationProvider + ?Sized + 'static,
{
    if let Err(errors) = body.validate() {
        tracing::warn!(request_id = %req.request_id(), "Workflow advance without request id");
        return missing_field_response(&errors, &["request_id"]);
    }

    let verification_id = body.request_id.as_deref().unwrap_or_default();
    match state.verification_service.advance_workflow(verification_id).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => handle_domain_error(&error),
    }
}
