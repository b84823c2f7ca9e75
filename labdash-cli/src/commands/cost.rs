use colored::Colorize;

use super::Context;
use crate::output::{print_cost, print_error, print_json, OutputFormat};

pub async fn cmd_cost(
    ctx: &Context,
    session: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = ctx.aggregator.cost_report(session).await;

    if format == OutputFormat::Json {
        return print_json(&report);
    }

    println!(
        "{} {}",
        "Session:".cyan().bold(),
        report.session.as_deref().unwrap_or("(none)")
    );
    println!();

    if let Some(error) = &report.error {
        print_error(error, report.suggestion.as_deref());
    }

    print_cost(&report.cost, ctx.cost_precision());

    if let Some(detail) = &report.cost.breakdown {
        let mut unpriced: Vec<&str> = [&detail.master_instance_type, &detail.worker_instance_type]
            .into_iter()
            .map(String::as_str)
            .filter(|t| ctx.aggregator.estimator().pricing().instance_rate(t).is_none())
            .collect();
        unpriced.dedup();
        if !unpriced.is_empty() {
            println!(
                "{}",
                format!(
                    "No list price for {}; fallback rates applied",
                    unpriced.join(", ")
                )
                .yellow()
            );
        }
    }

    Ok(())
}
