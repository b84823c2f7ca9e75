use super::Context;
use crate::output::{print_json, print_snapshot, OutputFormat};

pub async fn cmd_snapshot(
    ctx: &Context,
    session: Option<&str>,
    no_cost: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let snapshot = ctx.aggregator.build_snapshot(session).await;
    let fields = ctx.snapshot_fields(no_cost);

    match format {
        OutputFormat::Json => print_json(&snapshot.to_json_value(fields)?),
        OutputFormat::Text => {
            print_snapshot(&snapshot, fields, ctx.cost_precision());
            Ok(())
        }
    }
}
