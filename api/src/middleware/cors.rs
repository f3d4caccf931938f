//! CORS middleware configuration for cross-origin requests.
//!
//! The sign-in screen calls the orchestrator from a mobile app or a local
//! web page, so development is permissive. Production only accepts the
//! origins listed in `ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use sv_shared::Environment;

/// Preflight cache lifetime in seconds
const MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance for `environment`.
pub fn create_cors(environment: Environment, allowed_origins: &[String]) -> Cors {
    if environment.is_production() {
        create_production_cors(allowed_origins)
    } else {
        create_development_cors()
    }
}

fn create_development_cors() -> Cors {
    tracing::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(MAX_AGE)
}

fn create_production_cors(allowed_origins: &[String]) -> Cors {
    tracing::info!(
        origins = allowed_origins.len(),
        "Configuring CORS for production environment"
    );

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(MAX_AGE);

    for origin in allowed_origins {
        if origin.starts_with("https://") || origin.contains("://localhost") {
            cors = cors.allowed_origin(origin);
        } else {
            tracing::warn!(origin = %origin, "Ignoring non-HTTPS origin in production");
        }
    }

    cors
}
