use actix_web::{web, HttpServer};
use anyhow::Context;

use sv_api::routes::verification::AppState;
use sv_api::telemetry::init_tracing;
use sv_api::{create_app, Config};
use sv_core::services::VerificationService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        provider = %config.provider.kind,
        brand = %config.verification.brand,
        "Starting Silent Verify API server"
    );

    let provider = sv_infra::create_provider(&config.provider)
        .context("failed to initialize verification provider")?;
    let service = VerificationService::new(provider, config.verification.clone());
    let state = web::Data::new(AppState::new(service));

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    Ok(())
}
