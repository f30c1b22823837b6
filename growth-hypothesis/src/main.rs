use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use growth_hypothesis::{build_report, load_samples, reporter_for, Cli, Config};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    config.validate()?;

    debug!(?config, "configuration");

    // 1. Load samples
    let samples = load_samples(&cli.input)
        .with_context(|| format!("Failed to load samples from {}", cli.input.display()))?;
    info!(samples = samples.len(), "loaded samples");

    // 2. Analyze and summarize
    let now = cli.now.unwrap_or_else(Utc::now);
    let report = build_report(&config, &samples, now)?;

    // 3. Report results
    reporter_for(&config)
        .report(&report)
        .context("Failed to write report")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
