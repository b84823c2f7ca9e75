use std::time::Duration;

use colored::Colorize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use super::Context;
use crate::output::{print_snapshot, OutputFormat};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Rebuilds the snapshot every `interval_secs` until Ctrl+C. JSON output is
/// one compact document per line.
pub async fn cmd_watch(
    ctx: &Context,
    session: Option<&str>,
    interval_secs: Option<u64>,
    no_cost: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    watch_until(
        ctx,
        session,
        interval_secs,
        no_cost,
        format,
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Refresh loop behind `cmd_watch`; stops as soon as `shutdown` resolves,
/// including in the middle of a refresh.
pub async fn watch_until<F>(
    ctx: &Context,
    session: Option<&str>,
    interval_secs: Option<u64>,
    no_cost: bool,
    format: OutputFormat,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    let interval_secs = interval_secs.unwrap_or(ctx.config.display.refresh_interval_secs);
    if interval_secs == 0 {
        anyhow::bail!("Refresh interval must be at least 1 second");
    }

    let fields = ctx.snapshot_fields(no_cost);
    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    info!("Watching session every {}s", interval_secs);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = &mut shutdown => {
                result?;
                break;
            }
        }

        // A slow refresh must not hold up Ctrl+C.
        let snapshot = tokio::select! {
            snapshot = ctx.aggregator.build_snapshot(session) => snapshot,
            result = &mut shutdown => {
                result?;
                break;
            }
        };

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&snapshot.to_json_value(fields)?)?);
            }
            OutputFormat::Text => {
                print!("{}", CLEAR_SCREEN);
                print_snapshot(&snapshot, fields, ctx.cost_precision());
                println!();
                println!(
                    "{}",
                    format!("Refreshing every {}s. Press Ctrl+C to stop.", interval_secs).dimmed()
                );
            }
        }
    }

    info!("Watch stopped");
    Ok(())
}
