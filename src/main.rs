use anyhow::Context;
use clap::Parser;
use retro::cli::{Cli, Commands};
use retro::types::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("retro={}", log_level)
            .parse()
            .unwrap_or_else(|_| "retro=warn".parse().expect("fallback directive is valid")),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.general.log_format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            retro::cli::commands::init(path)?;
        }
        Commands::Chat => {
            retro::cli::commands::chat(&config)
                .await
                .context("Session ended with an error")?;
        }
        Commands::Ask { question } => {
            retro::cli::commands::ask(&question, &config)?;
        }
        Commands::Teach {
            question,
            answer,
            details,
            category,
        } => {
            retro::cli::commands::teach(&question, &answer, details, category, &config)?;
        }
        Commands::Expand => {
            retro::cli::commands::expand(&config)?;
        }
        Commands::UpdateTft { patch, input } => {
            retro::cli::commands::update_tft(&patch, &input, &config)
                .with_context(|| format!("Failed to install TFT patch {}", patch))?;
        }
        Commands::Solve { expression } => {
            retro::cli::commands::solve(&expression);
        }
        Commands::Qr { data, output } => {
            retro::cli::commands::qr(&data, output, &config)?;
        }
        Commands::Stats => {
            retro::cli::commands::stats(&config)?;
        }
        Commands::Version => {
            retro::cli::commands::version();
        }
    }

    Ok(())
}
