use colored::Colorize;
use labdash_core::get_config_dir;

use super::Context;
use crate::output::{print_json, OutputFormat};

pub fn cmd_health(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let health = ctx.aggregator.health();

    match format {
        OutputFormat::Json => print_json(&health),
        OutputFormat::Text => {
            println!(
                "{} {} ({})",
                "✓".green().bold(),
                health.status.green(),
                health.timestamp.to_rfc3339()
            );
            Ok(())
        }
    }
}

pub async fn cmd_status(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let config = &ctx.config;
    let terraform_dir = config.paths.terraform_dir();
    let sessions_dir = config.paths.sessions_dir();
    let listing = ctx.aggregator.session_listing().await;

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "terraform": {
                "binary": config.terraform.binary,
                "directory": terraform_dir,
                "directory_exists": terraform_dir.is_dir(),
                "workspace": listing.current,
            },
            "sessions": {
                "directory": sessions_dir,
                "count": listing.sessions.len(),
            },
            "config_dir": get_config_dir(),
            "pricing": {
                "region": config.pricing.region,
                "instance_types": ctx.aggregator.estimator().pricing().instance_types(),
            },
        });
        return print_json(&output);
    }

    println!("{}", "Lab Dashboard Status".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());

    let dir_state = if terraform_dir.is_dir() {
        "found".green()
    } else {
        "missing".red()
    };
    println!("  {:<18} {}", "Terraform:".bold(), config.terraform.binary);
    println!(
        "  {:<18} {} ({})",
        "Stack directory:".bold(),
        terraform_dir.display(),
        dir_state
    );
    println!(
        "  {:<18} {}",
        "Workspace:".bold(),
        listing
            .current
            .as_deref()
            .map(|w| w.green().to_string())
            .unwrap_or_else(|| "unknown".yellow().to_string())
    );
    println!(
        "  {:<18} {} ({} found)",
        "Sessions:".bold(),
        sessions_dir.display(),
        listing.sessions.len()
    );
    println!("  {:<18} {}", "Pricing region:".bold(), config.pricing.region);
    if let Some(dir) = get_config_dir() {
        println!("  {:<18} {}", "Config directory:".bold(), dir.display());
    }

    Ok(())
}

pub fn cmd_config(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&ctx.config),
        OutputFormat::Text => {
            print!("{}", ctx.config.to_toml()?);
            Ok(())
        }
    }
}
