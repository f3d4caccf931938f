//! Terminal sign-in screen
//!
//! Runs one verification attempt against the orchestrator and, when silent
//! authentication falls back to SMS, reads codes from stdin until the number
//! is verified or input ends.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use sv_client::config::{baked_backend_url, baked_default_phone};
use sv_client::{
    ClientConfig, ClientError, HttpBackend, HttpSilentAuthClient, SessionSnapshot, Transition,
    WorkflowController,
};

#[derive(Parser)]
#[command(name = "verify-cli")]
#[command(about = "Verify a phone number with silent auth, falling back to SMS")]
struct Cli {
    /// Orchestrator base URL
    #[arg(long, env = "VERIFY_BACKEND_URL", default_value = baked_backend_url())]
    backend_url: String,

    /// Phone number in E.164 format
    #[arg(long, env = "VERIFY_DEFAULT_PHONE")]
    phone: Option<String>,

    /// SMS code to submit right away if the flow falls back to SMS
    #[arg(long)]
    code: Option<String>,

    /// Timeout for each HTTP call in seconds
    #[arg(long, env = "VERIFY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn print_status(snapshot: &SessionSnapshot) {
    if let Some(message) = &snapshot.message {
        println!("{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let phone = cli
        .phone
        .or_else(|| baked_default_phone().map(str::to_string))
        .context("No phone number given; pass --phone or set VERIFY_DEFAULT_PHONE")?;

    let config = ClientConfig {
        backend_url: cli.backend_url,
        default_phone: Some(phone.clone()),
        request_timeout_secs: cli.timeout_secs,
    };
    let backend = HttpBackend::new(&config).context("Failed to build orchestrator client")?;
    let silent_auth = HttpSilentAuthClient::new(Duration::from_secs(config.request_timeout_secs))
        .context("Failed to build check URL client")?;
    let controller = WorkflowController::new(Arc::new(backend), Arc::new(silent_auth));

    println!("Verifying {} via {}", phone, config.base_url());
    controller.begin_verification(&phone).await?;
    let snapshot = controller.snapshot();
    print_status(&snapshot);

    if snapshot.state.is_terminal() {
        return Ok(());
    }
    if !snapshot.state.accepts_sms_code() {
        anyhow::bail!("Verification could not be started");
    }

    let mut pending = cli.code.into_iter();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let code = match pending.next() {
            Some(code) => code,
            None => {
                println!("Enter SMS code:");
                match lines.next_line().await.context("Failed to read stdin")? {
                    Some(line) => line,
                    None => anyhow::bail!("Input ended before the number was verified"),
                }
            }
        };

        match controller.submit_code(&code).await {
            Ok(Transition::Applied(state)) if state.is_terminal() => {
                print_status(&controller.snapshot());
                return Ok(());
            }
            Ok(_) => print_status(&controller.snapshot()),
            Err(ClientError::MissingField(_)) => println!("Please enter the code"),
            Err(e) => return Err(e.into()),
        }
    }
}
