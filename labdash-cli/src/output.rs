use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use labdash_core::{CostBreakdown, ParticipantRecord, SessionSnapshot, SnapshotFields};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

pub fn format_usd(amount: f64, precision: usize) -> String {
    format!("${:.*}", precision, amount)
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(*h).fg(Color::White))
                .collect::<Vec<_>>(),
        );
    table
}

fn ip_cell(ip: &str) -> Cell {
    if ip == labdash_core::models::NOT_AVAILABLE {
        Cell::new(ip).fg(Color::DarkGrey)
    } else {
        Cell::new(ip)
    }
}

pub fn participants_table(participants: &[ParticipantRecord]) -> Table {
    let mut table = new_table(&[
        "Participant",
        "Master IP",
        "Master Private IP",
        "Workers",
        "Worker IPs",
        "SSH",
    ]);

    for participant in participants {
        table.add_row(vec![
            Cell::new(&participant.name).fg(Color::Cyan),
            ip_cell(&participant.master_ip),
            ip_cell(&participant.master_private_ip),
            Cell::new(participant.worker_count.to_string()),
            Cell::new(participant.worker_public_ips.join("\n")),
            Cell::new(&participant.ssh_command).fg(Color::Green),
        ]);
    }

    table
}

pub fn cost_table(cost: &CostBreakdown, precision: usize) -> Table {
    let mut table = new_table(&["Component", "Hourly", "Daily"]);

    let rows = [
        ("EC2", cost.ec2),
        ("EBS (gp3)", cost.ebs),
        ("NAT Gateway", cost.nat_gateway),
    ];
    for (label, hourly) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_usd(hourly, precision)),
            Cell::new(format_usd(hourly * 24.0, 2)),
        ]);
    }

    table.add_row(vec![
        Cell::new("Total").fg(Color::Yellow),
        Cell::new(format_usd(cost.total_hourly, precision)).fg(Color::Yellow),
        Cell::new(format_usd(cost.daily(), 2)).fg(Color::Yellow),
    ]);

    table
}

/// One-line summary of the inputs behind a cost figure.
pub fn cost_basis(cost: &CostBreakdown, precision: usize) -> Option<String> {
    let detail = cost.breakdown.as_ref()?;
    Some(format!(
        "{} cluster(s) x ({} {}/h + {} x {} {}/h), {} NAT gateway(s), {} GB gp3",
        detail.clusters,
        detail.master_instance_type,
        format_usd(detail.master_hourly_cost, precision),
        detail.worker_count_per_cluster,
        detail.worker_instance_type,
        format_usd(detail.worker_hourly_cost, precision),
        detail.nat_gateways,
        detail.storage_gb,
    ))
}

pub fn print_cost(cost: &CostBreakdown, precision: usize) {
    println!("{}", "Hourly Cost".yellow().bold());
    println!("{}", cost_table(cost, precision));
    if let Some(basis) = cost_basis(cost, precision) {
        println!("{}", basis.dimmed());
    }
}

/// Red error line plus the operator hint, if any.
pub fn print_error(error: &str, suggestion: Option<&str>) {
    println!("{} {}", "Error:".red().bold(), error.red());
    if let Some(suggestion) = suggestion {
        println!("  {} {}", "Suggestion:".yellow(), suggestion);
    }
    println!();
}

pub fn print_snapshot(snapshot: &SessionSnapshot, fields: SnapshotFields, precision: usize) {
    println!(
        "{} {}",
        "Session:".cyan().bold(),
        snapshot.session.as_deref().unwrap_or("(none)")
    );
    println!(
        "{}",
        format!("Updated: {}", snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    );
    println!();

    if let Some(error) = &snapshot.error {
        print_error(error, snapshot.suggestion.as_deref());
    }

    if snapshot.participants.is_empty() {
        if !snapshot.is_degraded() {
            println!("{}", "No participants provisioned in this session.".yellow());
        }
    } else {
        println!(
            "{} {}",
            "Participants:".bold(),
            snapshot.participant_count.to_string().cyan()
        );
        println!("{}", participants_table(&snapshot.participants));
    }

    if fields.include_cost {
        println!();
        print_cost(&snapshot.cost, precision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labdash_core::{CostEstimator, Topology};

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.364915, 4), "$0.3649");
        assert_eq!(format_usd(8.758, 2), "$8.76");
        assert_eq!(format_usd(0.0, 4), "$0.0000");
    }

    #[test]
    fn test_cost_basis() {
        let cost = CostEstimator::default().estimate(3, &Topology::default());
        let basis = cost_basis(&cost, 4).unwrap();

        assert!(basis.starts_with("3 cluster(s)"));
        assert!(basis.contains("t3.medium $0.0416/h"));
        assert!(basis.contains("2 x t3.small $0.0208/h"));
        assert!(basis.contains("210 GB gp3"));

        assert!(cost_basis(&CostBreakdown::zeroed(), 4).is_none());
    }

    #[test]
    fn test_participants_table_rows() {
        let participants = vec![ParticipantRecord::new(
            "alice",
            "54.75.10.1",
            "10.0.1.10",
            vec!["54.75.10.2".to_string()],
            vec![],
        )];
        let rendered = participants_table(&participants).to_string();

        assert!(rendered.contains("alice"));
        assert!(rendered.contains("ssh ubuntu@54.75.10.1"));
    }
}
