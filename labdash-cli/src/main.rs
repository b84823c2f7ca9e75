use clap::{Parser, Subcommand};
use colored::Colorize;
use labdash_core::{CliErrorDisplay, LabdashConfig, LabdashError, LoggingConfig};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

use commands::{
    cmd_config, cmd_cost, cmd_health, cmd_sessions, cmd_snapshot, cmd_status, cmd_watch,
    cmd_workspace, Context,
};
use output::OutputFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "labdash")]
#[command(version = VERSION)]
#[command(about = "Labdash - Read-only dashboard for Terraform-provisioned Kubernetes labs")]
#[command(long_about = r#"
Labdash reports who is provisioned in a lab session, how to reach their
clusters, and what the session costs per hour. It only reads Terraform state:
nothing is created or destroyed.

Use 'labdash sessions' to list sessions, then 'labdash snapshot <SESSION>'
for participants and cost.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List lab sessions and mark the active workspace")]
    Sessions {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Show the active Terraform workspace")]
    Workspace {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Show participants and cost for a session")]
    Snapshot {
        #[arg(help = "Session to select first (defaults to the active workspace)")]
        session: Option<String>,

        #[arg(long, help = "Leave cost figures out of the output")]
        no_cost: bool,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Show the hourly cost breakdown for a session")]
    Cost {
        #[arg(help = "Session to select first (defaults to the active workspace)")]
        session: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Refresh the session snapshot periodically")]
    Watch {
        #[arg(help = "Session to select on every refresh")]
        session: Option<String>,

        #[arg(short, long, help = "Seconds between refreshes (defaults to display.refresh_interval_secs)")]
        interval: Option<u64>,

        #[arg(long, help = "Leave cost figures out of the output")]
        no_cost: bool,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Liveness check")]
    Health {
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    #[command(about = "Show resolved paths, Terraform binary and active workspace")]
    Status {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Print the effective configuration")]
    Config {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match LabdashConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, &LoggingConfig::default());
            let err = LabdashError::from(e);
            tracing::debug!(code = err.error_code(), "Configuration failed to load");
            eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(&err));
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose, &config.logging);

    match run(cli, config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: LabdashConfig) -> anyhow::Result<()> {
    let ctx = Context::new(config);

    match cli.command {
        Commands::Sessions { format } => cmd_sessions(&ctx, format).await,
        Commands::Workspace { format } => cmd_workspace(&ctx, format).await,
        Commands::Snapshot {
            session,
            no_cost,
            format,
        } => cmd_snapshot(&ctx, session.as_deref(), no_cost, format).await,
        Commands::Cost { session, format } => cmd_cost(&ctx, session.as_deref(), format).await,
        Commands::Watch {
            session,
            interval,
            no_cost,
            format,
        } => cmd_watch(&ctx, session.as_deref(), interval, no_cost, format).await,
        Commands::Health { format } => cmd_health(&ctx, format),
        Commands::Status { format } => cmd_status(&ctx, format).await,
        Commands::Config { format } => cmd_config(&ctx, format),
        Commands::Version { detailed } => cmd_version(detailed, &ctx.config),
    }
}

fn cmd_version(detailed: bool, config: &LabdashConfig) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "Labdash Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!();
        println!("  {}", "Pricing:".bold());
        println!("    Region:       {}", config.pricing.region);
        println!(
            "    Instances:    {}",
            config.pricing_table().instance_types().join(", ")
        );
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("labdash {}", VERSION);
    }

    Ok(())
}
