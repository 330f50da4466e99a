//! GoQuizbox server: account and session API.
//!
//! Main entry point that loads configuration, initializes logging, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use quizbox_core::config::AppConfig;
use quizbox_core::config::logging::LogFormat;
use quizbox_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = quizbox_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/default.toml`, the `QUIZBOX_ENV`
/// overlay, and `QUIZBOX__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("QUIZBOX_ENV").unwrap_or_else(|_| "local".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }

    tracing::info!(
        environment = %config.environment,
        log_format = %config.logging.format,
        "Logging initialized"
    );
}
