mod report;

use aqua_config::ConfigLoader;
use aqua_logging::init_logging;
use aqua_telemetry::{DashboardDriver, DashboardSession, DeviceRegistry};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config directory (reads engine.toml)
    #[arg(short, long, default_value = "./config")]
    config_dir: String,

    /// Device selected at startup, overrides simulation.default_device
    #[arg(short, long)]
    device: Option<String>,

    /// Stop after this many refresh ticks (0 = run until Ctrl+C)
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Write a default engine.toml into the config directory and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loader = ConfigLoader::new(&args.config_dir);

    if args.init_config {
        let path = loader.write_default()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = loader.load_validated()?;
    init_logging(&config.logging)?;

    info!(
        name = %config.system.name,
        config_dir = %args.config_dir,
        devices = config.devices.len(),
        "Starting water quality dashboard"
    );

    let profiles = config.device_profiles();
    let registry = match config.simulation.seed {
        Some(seed) => DeviceRegistry::with_seed(profiles, seed)?,
        None => DeviceRegistry::new(profiles)?,
    }
    .with_history_interval(config.history_interval())?;

    let device_id = args
        .device
        .unwrap_or_else(|| config.simulation.default_device.clone());
    let session =
        DashboardSession::open_with_history(Arc::new(registry), &device_id, config.history.points)
            .await?;

    let driver = DashboardDriver::new(session, config.refresh_interval());
    let mut snapshots = driver.subscribe();

    report::report(&driver.snapshot().await);
    driver.start().await;

    let mut remaining = args.ticks;
    loop {
        tokio::select! {
            received = snapshots.recv() => match received {
                Ok(snapshot) => {
                    report::report(&snapshot);
                    if args.ticks > 0 {
                        remaining -= 1;
                        if remaining == 0 {
                            info!(ticks = args.ticks, "Tick limit reached");
                            break;
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Snapshot receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C");
                break;
            }
        }
    }

    driver.stop().await;
    info!("Dashboard stopped");
    Ok(())
}
