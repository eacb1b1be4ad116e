use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use cloudops_dash::app::App;
use cloudops_dash::cli::{Cli, Commands, ConfigAction};
use cloudops_dash::core::{ApiClient, ContainerId, PollResult, PollingSession, Sample, SampleWindow};
use cloudops_dash::utils::logging;
use cloudops_dash::utils::{
    containers_failure_message, format_bytes, format_interval, format_percent, truncate_string, AppConfig,
    ContainerState, Overrides, StatusTone, STATS_FAILURE_MESSAGE,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment overrides may come from a .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::config_path()?,
    };
    let overrides = cli.overrides();

    match cli.command {
        None => {
            // No command - run interactive TUI
            let config = AppConfig::resolve(Some(&config_path), &overrides)?;
            logging::init_file_logging(&config.logging.level, &config.log_path()?)?;
            let mut app = App::new(config)?;
            app.run().await?;
        }
        Some(Commands::Containers { json }) => {
            let config = AppConfig::resolve(Some(&config_path), &overrides)?;
            logging::init_stderr_logging(&config.logging.level);
            handle_containers(&config, json).await?;
        }
        Some(Commands::Stats {
            id,
            samples,
            interval_ms,
        }) => {
            let config = AppConfig::resolve(Some(&config_path), &overrides)?;
            logging::init_stderr_logging(&config.logging.level);
            handle_stats(&config, id, samples, interval_ms).await?;
        }
        Some(Commands::Config { action }) => {
            handle_config(action, config_path, &overrides)?;
        }
    }

    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn colored_status(status: &str) -> String {
    match ContainerState::from(status).tone() {
        StatusTone::Success => status.green().to_string(),
        StatusTone::Destructive => status.red().to_string(),
        StatusTone::Muted => status.dimmed().to_string(),
    }
}

async fn handle_containers(config: &AppConfig, json: bool) -> Result<()> {
    let client = ApiClient::new(config.api_config())?;

    let pb = spinner("Fetching containers...")?;
    let result = client.list_containers().await;
    pb.finish_and_clear();

    let containers = result.with_context(|| containers_failure_message(client.base_url()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&containers)?);
        return Ok(());
    }

    if containers.is_empty() {
        println!("No containers found");
        return Ok(());
    }

    println!("{}\n", format!("Docker Containers ({})", containers.len()).bold());
    println!("{:<14} {:<25} {:<35} {:<15}", "ID", "Name", "Image", "Status");
    println!("{}", "-".repeat(90));

    for container in &containers {
        println!(
            "{:<14} {:<25} {:<35} {}",
            container.id.short(),
            truncate_string(&container.name, 25),
            truncate_string(&container.image, 35),
            colored_status(&container.status)
        );
    }

    Ok(())
}

async fn handle_stats(config: &AppConfig, id: String, samples: usize, interval_ms: Option<u64>) -> Result<()> {
    // clap bounds --samples and --interval-ms
    let mut options = config.stats_options();
    if let Some(ms) = interval_ms {
        options.interval = Duration::from_millis(ms);
    }

    let client = ApiClient::new(config.api_config())?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = PollingSession::start(client.stats_fetcher(ContainerId::new(id.clone())), options, move |result| {
        let _ = tx.send(result);
    });

    println!(
        "{} {} (every {}, {} samples)\n",
        "Container stats:".bold(),
        id.cyan(),
        format_interval(options.interval),
        samples
    );
    println!("{:<10} {:>10} {:>10} {:>25}", "Time", "CPU", "Memory", "Usage / Limit");
    println!("{}", "-".repeat(58));

    let mut window = SampleWindow::with_capacity(samples);
    while window.len() < samples {
        tokio::select! {
            result = rx.recv() => match result {
                Some(PollResult::Success { payload, completed_at }) => {
                    let sample = Sample::from_stats(&payload, completed_at);
                    println!(
                        "{:<10} {:>10} {:>10} {:>25}",
                        sample.time_label(),
                        format_percent(sample.cpu_percent),
                        format_percent(sample.memory_percent),
                        format!("{} / {}", format_bytes(payload.memory_usage_bytes()), format_bytes(payload.memory_limit_bytes()))
                    );
                    window.append(sample);
                }
                Some(PollResult::Failure(err)) => {
                    eprintln!("{} {} ({})", "✗".red(), STATS_FAILURE_MESSAGE, err);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.stop();
    print_summary(&window);

    Ok(())
}

fn print_summary(window: &SampleWindow) {
    println!("\n{}", format!("Summary over {} sample(s)", window.len()).bold());

    let rows = [
        ("CPU", window.summary(|s| s.cpu_percent)),
        ("Memory", window.summary(|s| s.memory_percent)),
    ];

    for (label, summary) in rows {
        match summary {
            Some(s) => println!(
                "  {:<8} min {:>8}  avg {:>8}  max {:>8}",
                label,
                format_percent(s.min),
                format_percent(s.avg),
                format_percent(s.max)
            ),
            None => println!("  {:<8} no samples", label),
        }
    }
}

fn handle_config(action: ConfigAction, path: PathBuf, overrides: &Overrides) -> Result<()> {
    match action {
        ConfigAction::View => {
            let config = AppConfig::resolve(Some(&path), overrides)?;
            println!("# Effective configuration ({})\n", path.display());
            println!("{}", toml::to_string_pretty(&config).context("Failed to serialize config")?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default().save_to(&path)?;
            println!("{} Wrote default config to {}", "✓".green(), path.display());
        }
    }

    Ok(())
}
