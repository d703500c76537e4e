//! Headless encounter runner.
//!
//! Loads content, runs one encounter with the scripted player, logs the
//! event stream to stderr and prints the final snapshot as JSON.
mod config;
mod report;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use config::CliConfig;
use runtime::{Runtime, RuntimeConfig, ScriptedPlayer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();
    let config = CliConfig::from_env();
    tracing::info!(
        content = %config.content_dir.display(),
        encounter = %config.encounter,
        seed = config.seed,
        "starting encounter"
    );

    let factory = ContentFactory::new(&config.content_dir);
    let combat = factory.load_config()?;
    let catalog = factory.load_actions()?;
    let roster = factory.load_encounter(&config.encounter, &catalog)?;

    let runtime_config = RuntimeConfig {
        combat,
        seed: config.seed,
        tick_interval: config.tick_interval,
        clock: config.clock,
        max_ticks: config.max_ticks,
        ..RuntimeConfig::default()
    };

    let mut runtime = Runtime::builder()
        .config(runtime_config)
        .players(roster.players)
        .enemies(roster.enemies)
        .player_input(ScriptedPlayer)
        .build()
        .await
        .context("failed to set up encounter")?;

    let reporter = report::spawn(runtime.handle());
    let victory = runtime.run_until_finished().await?;

    let snapshot = runtime.handle().query_state().await?;
    runtime.shutdown().await?;
    reporter.await.context("event reporter failed")?;

    report::summary(&snapshot);
    tracing::info!(victory, "encounter finished");

    // Machine-readable result on stdout; logs stay on stderr.
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Setup logging to stderr; `RUST_LOG` overrides the `info` default.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
