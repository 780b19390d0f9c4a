use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use dinematch_node::{
    api::rest::{start_rest_api, AppState},
    cli::Args,
    config::Config,
    places::GooglePlacesClient,
    setup::ensure_config,
};
use dinematch_session::SessionStore;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Parse Arguments
    let args = Args::parse();

    // 2. Load Config (written with defaults on first start)
    let created = ensure_config(&args.config)?;
    let mut config = Config::load_from_file(&args.config)?;
    config.apply_env_overrides();
    if let Some(port) = args.port {
        config.port = port;
    }

    // 3. Initialize Logging
    std::panic::set_hook(Box::new(|info| {
        let msg = match info.payload().downcast_ref::<&'static str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };
        let location = match info.location() {
            Some(l) => format!("at {}:{}:{}", l.file(), l.line(), l.column()),
            None => "unknown location".to_string(),
        };
        eprintln!("CRASH: {} {}", msg, location);
    }));

    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "audit-dinematch.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // session lifecycle and votes go to the audit file only
    let audit_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target() == "consensus"
        }));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dinematch_node=debug".into()),
        )
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target() != "consensus"
        }));

    tracing_subscriber::registry()
        .with(audit_layer)
        .with(stdout_layer)
        .init();

    info!("--- STARTING DINEMATCH NODE ---");
    info!("Config: {}{}", args.config.display(), if created { " (new)" } else { "" });
    if config.places_api_key.is_empty() {
        warn!("⚠️ No places API key configured, session creation will fail upstream");
    }

    // 4. Shared State
    let store = Arc::new(SessionStore::new());
    let places = Arc::new(GooglePlacesClient::from_config(&config));
    let state = AppState::new(store, places, PathBuf::from(&config.export_dir));

    // 5. Serve
    if let Err(e) = start_rest_api(&config.bind_addr(), state).await {
        error!("REST API stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}
