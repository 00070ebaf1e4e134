use std::{env, fs};

use anyhow::Context;
use log::{info, warn};

use splitter_rs::error::InputError;
use splitter_rs::formatter::{format_net_and_gross, format_receipts, format_summary};
use splitter_rs::{
    net_and_gross, receipt_list, settlement_summary, validate_project, Label, Project,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Report {
    Summary,
    Transfers,
    Receipts,
    Text,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let label = if args.iter().any(|a| a == "--by-id") {
        Label::Id
    } else {
        Label::Name
    };
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));

    let path = positional.next().ok_or(InputError::MissingSnapshotPath)?;
    let report = match positional.next().map(String::as_str) {
        None | Some("summary") => Report::Summary,
        Some("transfers") => Report::Transfers,
        Some("receipts") => Report::Receipts,
        Some("text") => Report::Text,
        Some(other) => return Err(InputError::unknown_report(other).into()),
    };

    let project = load_project(path)?;
    info!(
        "Loaded project {} with {} participants and {} expenses",
        project.id,
        project.participants.len(),
        project.expenses.len()
    );

    for issue in validate_project(&project) {
        match issue.expense_id {
            Some(id) => warn!("Expense {id} is not valid: {}", issue.error),
            None => warn!("Project is not valid: {}", issue.error),
        }
    }

    let output = match report {
        Report::Summary => serde_json::to_string_pretty(&settlement_summary(&project, label))?,
        Report::Transfers => serde_json::to_string_pretty(&net_and_gross(&project, label))?,
        Report::Receipts => serde_json::to_string_pretty(&receipt_list(&project))?,
        Report::Text => format!(
            "{}\n{}\n{}",
            format_summary(&settlement_summary(&project, label)),
            format_net_and_gross(&net_and_gross(&project, label)),
            format_receipts(&receipt_list(&project))
        ),
    };
    println!("{output}");

    Ok(())
}

fn load_project(path: &str) -> anyhow::Result<Project> {
    let source = fs::read_to_string(path).context(InputError::unreadable_snapshot(path))?;
    let project =
        serde_json::from_str(&source).context(InputError::invalid_snapshot(path))?;
    Ok(project)
}
