//! Headless demo: roam for a while and log what the mascot does.

use anyhow::Context;
use clap::Parser;
use mascot_engine::config::default_config_path;
use mascot_engine::mascot::config::CONFIG_FILE_NAME;
use mascot_engine::mascot::{load_config, MascotConfig};
use mascot_engine::Mascot;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mascot-engine", version, about = "Run the mascot without a renderer")]
struct Args {
    /// Config file. Defaults to the per-user config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run.
    #[arg(short, long)]
    seed: Option<u64>,

    /// How long to roam before exiting.
    #[arg(short, long, default_value_t = 60)]
    duration_secs: u64,

    /// Print every change as a JSON line instead of logging it.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let path = args
        .config
        .unwrap_or_else(|| default_config_path(CONFIG_FILE_NAME));
    let mut config: MascotConfig = load_config(&path);
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mascot = Mascot::new(config).context("failed to build mascot")?;
    tracing::info!(mascot = %mascot.id(), config = %path.display(), "mascot ready");

    let json = args.json;
    let _sub = mascot.on_change(move |event| {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            }
        } else {
            tracing::info!(
                revision = event.revision,
                state = %event.state,
                x = event.position.x,
                y = event.position.y,
                cause = ?event.cause,
                "mascot changed"
            );
        }
    });

    mascot.start_roaming();

    let total = Duration::from_secs(args.duration_secs);
    let halfway = tokio::time::sleep(total / 2);
    let end = tokio::time::sleep(total);
    tokio::pin!(halfway, end);
    let mut celebrated = false;

    loop {
        tokio::select! {
            _ = &mut halfway, if !celebrated => {
                celebrated = true;
                mascot.trigger_celebration();
            }
            _ = &mut end => break,
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                tracing::info!("interrupted");
                break;
            }
        }
    }

    mascot.stop_roaming();
    let snapshot = mascot.get_current_state();
    tracing::info!(
        state = %snapshot.state,
        ticks = mascot.ticks(),
        mood = %snapshot.ledger.label,
        "mascot stopped"
    );
    Ok(())
}
