mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cospend_core::{
    MemberBalances, MemberId, Project, SettlementEngine, SettlementMode, SettlementPlan,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::settings::Settings;

/// Settle shared expenses from a project snapshot
#[derive(Debug, Parser)]
#[command(name = "cospend-settle", version)]
struct Cli {
    /// Settings file (defaults to ./settle.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Currency decimal places, overrides the settings
    #[arg(long, global = true)]
    precision: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print each member's balance
    Balances {
        #[command(flatten)]
        input: InputArgs,

        /// Also list disabled members whose balance is settled
        #[arg(long)]
        show_disabled: bool,
    },

    /// Print the settlement plan
    Plan {
        #[command(flatten)]
        input: InputArgs,

        /// Route every transaction through this member
        #[arg(long)]
        center: Option<i64>,
    },

    /// Print the reimbursement bills that would settle the project
    Reimburse {
        #[command(flatten)]
        input: InputArgs,

        /// Route every transaction through this member
        #[arg(long)]
        center: Option<i64>,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Project snapshot JSON: {"members": [...], "bills": [...]}
    #[arg(short, long)]
    input: PathBuf,

    /// Only count bills dated strictly before this unix timestamp
    #[arg(long)]
    max_timestamp: Option<i64>,
}

fn main() {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load settings: {e:#}");
            std::process::exit(1);
        }
    };
    settings.logging.init();

    if let Err(e) = run(cli, &settings) {
        error!(error = %format!("{e:#}"), "Settlement failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli, settings: &Settings) -> anyhow::Result<()> {
    let engine = settings.engine(cli.precision)?;

    match cli.command {
        Command::Balances { input, show_disabled } => {
            print_json(&balances(&engine, &input, show_disabled)?)
        }
        Command::Plan { input, center } => {
            let (_, plan) = settle(&engine, &input, center)?;
            print_json(&plan)
        }
        Command::Reimburse { input, center } => {
            let (project, plan) = settle(&engine, &input, center)?;
            let bills = engine.reimbursements(
                &plan.transactions,
                &project.member_names(),
                input.max_timestamp,
            )?;
            print_json(&bills)
        }
    }
}

fn balances(
    engine: &SettlementEngine,
    input: &InputArgs,
    show_disabled: bool,
) -> anyhow::Result<MemberBalances> {
    let project = load_project(&input.input)?;
    let balances = if show_disabled {
        project.balances(input.max_timestamp)?
    } else {
        project.displayed_balances(input.max_timestamp, engine.config().zero_threshold())?
    };
    Ok(balances)
}

fn settle(
    engine: &SettlementEngine,
    input: &InputArgs,
    center: Option<i64>,
) -> anyhow::Result<(Project, SettlementPlan)> {
    let project = load_project(&input.input)?;
    let mode = match center {
        Some(id) => {
            let id = MemberId(id);
            if project.member(id).is_none() {
                anyhow::bail!("center member {id} is not part of the project");
            }
            SettlementMode::CenteredOn(id)
        }
        None => SettlementMode::Optimal,
    };

    let balances = project.balances(input.max_timestamp)?;
    let plan = engine.plan(balances, mode)?;
    Ok((project, plan))
}

fn load_project(path: &Path) -> anyhow::Result<Project> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let project = Project::from_json(&raw)
        .with_context(|| format!("invalid project snapshot {}", path.display()))?;
    info!(
        members = project.members.len(),
        bills = project.bills.len(),
        "Project loaded"
    );
    Ok(project)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_with_center() {
        let cli = Cli::try_parse_from([
            "cospend-settle",
            "plan",
            "--input",
            "project.json",
            "--center",
            "3",
            "--precision",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.precision, Some(0));
        match cli.command {
            Command::Plan { input, center } => {
                assert_eq!(input.input, PathBuf::from("project.json"));
                assert_eq!(input.max_timestamp, None);
                assert_eq!(center, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_balances_hide_settled_disabled_members() {
        let path = std::env::temp_dir()
            .join(format!("cospend-disabled-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"members": [{"id": 1, "name": "a"},
                            {"id": 2, "name": "b"},
                            {"id": 3, "name": "c", "activated": false}],
                "bills": [{"payer_id": 1, "amount": 8.0, "owers": [1, 2]}]}"#,
        )
        .unwrap();
        let input = InputArgs {
            input: path.clone(),
            max_timestamp: None,
        };
        let engine = SettlementEngine::default();

        let shown = balances(&engine, &input, false).unwrap();
        assert_eq!(shown.len(), 2);
        assert!(!shown.contains_key(&MemberId(3)));
        assert_eq!(balances(&engine, &input, true).unwrap().len(), 3);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_settle_rejects_unknown_center() {
        let path = std::env::temp_dir().join(format!("cospend-project-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"members": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
                "bills": [{"payer_id": 1, "amount": 8.0, "owers": [1, 2]}]}"#,
        )
        .unwrap();
        let input = InputArgs {
            input: path.clone(),
            max_timestamp: None,
        };
        let engine = SettlementEngine::default();

        let (_, plan) = settle(&engine, &input, None).unwrap();
        assert_eq!(plan.transactions.len(), 1);
        assert_eq!(plan.transactions[0].amount, 4.0);
        assert!(settle(&engine, &input, Some(5)).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
