//! Application factory
//!
//! Builds the Actix-web application around an already-initialised
//! verification service.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sv_core::services::VerificationProvider;

use crate::config::Config;
use crate::handlers::{json_error_handler, not_found};
use crate::middleware::{cors::create_cors, RequestIdMiddleware};
use crate::routes::verification::{
    callback, check_code, next_workflow, start_verification, AppState,
};

/// Plain-text banner served on `GET /`
pub const BANNER: &str = "Vonage Verify backend is running.";

/// Create and configure the application with all dependencies
pub fn create_app<P>(
    app_state: web::Data<AppState<P>>,
    config: &Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    P: VerificationProvider + ?Sized + 'static,
{
    let cors = create_cors(config.environment, &config.allowed_origins);

    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Last `wrap` is outermost: correlation id, access log, CORS
        .wrap(cors)
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .route("/", web::get().to(banner))
        .route("/health", web::get().to(health_check))
        .route("/verification", web::post().to(start_verification::<P>))
        .route("/check-code", web::post().to(check_code::<P>))
        .route("/next", web::post().to(next_workflow::<P>))
        .route("/callback", web::post().to(callback::<P>))
        .default_service(web::route().to(not_found))
}

async fn banner() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(BANNER)
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "silent-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
