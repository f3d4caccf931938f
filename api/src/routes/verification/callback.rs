use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde_json::{Map, Value};

use sv_core::domain::CallbackEvent;
use sv_core::services::VerificationProvider;

use super::AppState;
use crate::dto::CallbackAck;

/// Bytes of a callback body kept for parsing; anything beyond is drained
/// and the event is treated as unrecognized
pub const CALLBACK_BODY_LIMIT: usize = 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Handler for POST /callback
///
/// Status events pushed by the provider. The body is streamed rather than
/// extracted so that oversized, malformed or empty payloads are still
/// acknowledged with 200.
pub async fn callback<P>(
    state: web::Data<AppState<P>>,
    req: HttpRequest,
    mut payload: web::Payload,
) -> HttpResponse
where
    P: VerificationProvider + ?Sized + 'static,
{
    let mut body = web::BytesMut::new();
    let mut complete = true;

    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) if complete && body.len() + chunk.len() <= CALLBACK_BODY_LIMIT => {
                body.extend_from_slice(&chunk);
            }
            Ok(_) => complete = false,
            Err(e) => {
                tracing::warn!(error = %e, "Callback body could not be read");
                complete = false;
                break;
            }
        }
    }

    let event = if complete {
        parse_event(req.content_type(), &body)
    } else {
        tracing::warn!(kept = body.len(), "Callback body truncated");
        CallbackEvent::unrecognized(&String::from_utf8_lossy(&body))
    };

    state.verification_service.record_callback(&event);

    HttpResponse::Ok().json(CallbackAck {
        status: event.status,
    })
}

/// Build an event from a JSON or form-encoded body
fn parse_event(content_type: &str, body: &[u8]) -> CallbackEvent {
    if body.iter().all(u8::is_ascii_whitespace) {
        return CallbackEvent::from_payload(Value::Null);
    }

    if content_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        return match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            Ok(pairs) => {
                let fields: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect();
                CallbackEvent::from_payload(Value::Object(fields))
            }
            Err(_) => CallbackEvent::unrecognized(&String::from_utf8_lossy(body)),
        };
    }

    match serde_json::from_slice(body) {
        Ok(payload) => CallbackEvent::from_payload(payload),
        Err(_) => CallbackEvent::unrecognized(&String::from_utf8_lossy(body)),
    }
}
