use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use virtual_tryon::{
    config::AppConfig,
    models::{
        credential::Credential,
        item::{ItemType, TryOnItem},
    },
    services::{cancel::cancel_pair, runway::build_http_client, tryon::TryOnOrchestrator},
};

/// Generate a single virtual try-on and print the resulting image URL.
#[derive(Debug, Parser)]
#[command(name = "tryon", version)]
struct Args {
    /// Customer photo (data URI or http(s) URL)
    #[arg(long)]
    image: String,

    /// Product photo (data URI or http(s) URL)
    #[arg(long)]
    item_image: String,

    /// Product category: necklace, earring, set or clothing
    #[arg(long, default_value = "necklace")]
    item_type: ItemType,

    /// Product name, used in logs
    #[arg(long, default_value = "Custom item")]
    item_name: String,

    /// Runway API key; falls back to RUNWAY_API_KEY
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().expect("Failed to load configuration");

    let credential = match Credential::resolve(args.api_key.as_deref(), &config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "No usable Runway credential");
            return ExitCode::from(2);
        }
    };

    let http = build_http_client(&config).expect("Failed to build HTTP client");
    let orchestrator = TryOnOrchestrator::new(http, &config);
    let item = TryOnItem::new(args.item_name, args.item_type, args.item_image);

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning Runway task");
            cancel.cancel();
        }
    });

    match orchestrator
        .perform_virtual_try_on(&args.image, &item, &credential, &signal)
        .await
    {
        Ok(outcome) => {
            tracing::info!(
                task_id = %outcome.task_id,
                ratio = %outcome.ratio,
                model = %outcome.model,
                "Try-on finished"
            );
            println!("{}", outcome.output_url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(stage = e.stage(), error = %e, "Try-on failed");
            ExitCode::FAILURE
        }
    }
}
