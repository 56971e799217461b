//! Beacon demo host
//!
//! Embeds the statistics beacon in a stand-in host process, the way a real
//! host would from its enable/disable hooks. The simulated user count drifts
//! every few seconds.
//!
//! # Usage
//! ```sh
//! cargo run --bin beacon -- --interval 30 --dry-run --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use statbeacon::domain::ports::ReportTransport;
use statbeacon::infrastructure::http_transport::HttpTransport;
use statbeacon::infrastructure::mock::{ManualScheduler, MockHost, MockTransport, SharedGauge};
use statbeacon::infrastructure::scheduler::TokioScheduler;
use statbeacon::{BeaconBootstrap, ReporterConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Statistics beacon demo host", long_about = None)]
struct Cli {
    /// Product name reported in the endpoint path
    #[arg(long, default_value = "BeaconDemo")]
    product: String,

    /// Seconds between reports (defaults to the config file, then 3600)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Collector base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// TOML file with reporter settings (flags override it)
    #[arg(long)]
    config: Option<String>,

    /// Log soft failures at warn level
    #[arg(long)]
    debug: bool,

    /// Log reports instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Send one report immediately and exit
    #[arg(long)]
    once: bool,
}

/// Flags win over the config file, but only the ones actually given
fn apply_flags(config: &mut ReporterConfig, cli: &Cli) {
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    config.debug |= cli.debug;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint_base = endpoint.clone();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            ReporterConfig::from_toml_str(&raw)?
        }
        None => ReporterConfig::default(),
    };
    apply_flags(&mut config, &cli);

    info!("Beacon demo host {} starting...", env!("CARGO_PKG_VERSION"));

    let users = SharedGauge::default();
    let host = Arc::new(
        MockHost::new(&cli.product)
            .with_versions(env!("CARGO_PKG_VERSION"), "demo-host/1.0")
            .with_gauge(users.clone()),
    );

    let transport: Arc<dyn ReportTransport> = if cli.dry_run {
        Arc::new(MockTransport::responding(200).logging())
    } else {
        Arc::new(HttpTransport::from_config(&config))
    };

    if cli.once {
        let task = BeaconBootstrap::init_with(
            host,
            transport,
            Arc::new(ManualScheduler::new()),
            config,
        )?;
        let outcome = task.report_now().await;
        info!("Report outcome: {:?}", outcome);
        return Ok(());
    }

    let scheduler = Arc::new(TokioScheduler::current()?);
    let task = BeaconBootstrap::init_with(host, transport, scheduler, config)?;
    task.start()?;
    info!("Beacon running. Press Ctrl+C to shutdown.");

    let drift = tokio::spawn(async move {
        let mut count = 0i64;
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            count = (count + 3) % 20;
            users.set(count);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping beacon...");
    task.stop();
    drift.abort();
    info!("{}", task.reporter().metrics().render());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_CONFIG: &str = r#"
        interval_secs = 120
        endpoint_base = "https://collector.example.org/v1"
    "#;

    #[test]
    fn test_config_file_interval_kept_without_flag() {
        let cli = Cli::parse_from(["beacon", "--debug"]);
        let mut config = ReporterConfig::from_toml_str(FILE_CONFIG).unwrap();

        apply_flags(&mut config, &cli);

        assert_eq!(config.interval_secs, 120);
        assert_eq!(config.endpoint_base, "https://collector.example.org/v1");
        assert!(config.debug);
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = Cli::parse_from([
            "beacon",
            "--interval",
            "30",
            "--endpoint",
            "http://127.0.0.1:9000/v1",
        ]);
        let mut config = ReporterConfig::from_toml_str(FILE_CONFIG).unwrap();

        apply_flags(&mut config, &cli);

        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.endpoint_base, "http://127.0.0.1:9000/v1");
        assert!(!config.debug);
    }

    #[test]
    fn test_default_interval_without_file_or_flag() {
        let cli = Cli::parse_from(["beacon"]);
        let mut config = ReporterConfig::default();

        apply_flags(&mut config, &cli);

        assert_eq!(config.interval_secs, 3600);
    }
}
