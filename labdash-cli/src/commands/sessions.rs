use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use super::Context;
use crate::output::{print_json, OutputFormat};

pub async fn cmd_sessions(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let listing = ctx.aggregator.session_listing().await;

    if format == OutputFormat::Json {
        return print_json(&listing);
    }

    if listing.sessions.is_empty() {
        let directory = ctx.aggregator.sessions();
        println!(
            "{}",
            format!(
                "No *{} sessions found in {}",
                directory.suffix(),
                directory.dir().display()
            )
            .yellow()
        );
        return Ok(());
    }

    println!("{}", "Lab Sessions".cyan().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Session").fg(Color::White),
            Cell::new("Workspace").fg(Color::White),
        ]);

    for session in &listing.sessions {
        let (name, marker) = if listing.is_current(session) {
            (
                Cell::new(session).fg(Color::Green),
                Cell::new("● active").fg(Color::Green),
            )
        } else {
            (Cell::new(session), Cell::new(""))
        };
        table.add_row(vec![name, marker]);
    }

    println!("{table}");
    println!();
    println!("{} session(s)", listing.sessions.len().to_string().cyan());

    if let Some(current) = &listing.current {
        if !listing.sessions.contains(current) {
            println!(
                "{}",
                format!("Active workspace '{}' has no session file", current).dimmed()
            );
        }
    }

    Ok(())
}

pub async fn cmd_workspace(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let current = ctx.aggregator.current_workspace().await;

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "workspace": current }));
    }

    match current {
        Some(workspace) => println!("{}", workspace),
        None => println!("{}", "No active workspace".yellow()),
    }

    Ok(())
}
