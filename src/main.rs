mod cli;
mod config;
mod engine;
mod error;
mod ledger;
mod report;
mod snapshot;
mod telemetry;
mod types;

use crate::engine::classify::NationTier;
use crate::engine::unlock::{check_level_up, evaluate_unlock, LevelUpStatus};
use crate::error::NationError;
use crate::ledger::{GdpLedger, LedgerEntry};
use crate::snapshot::Snapshot;
use crate::types::config::NationConfig;
use crate::types::report::NationReport;
use clap::Parser;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INELIGIBLE: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 2;
}

/// Appends the ledger entry, then rewrites the snapshot. A ledger failure leaves
/// the snapshot untouched.
fn commit_snapshot(
    root: &Path,
    cfg: &NationConfig,
    path: &Path,
    snapshot: &mut Snapshot,
    nation_report: &NationReport,
    quiet: bool,
) -> Result<(), NationError> {
    let gdp_ledger = GdpLedger::new(root, Some(cfg));
    let entry = LedgerEntry::new(
        &nation_report.gdp,
        snapshot.user.total_gdp,
        &nation_report.classification,
    );
    gdp_ledger.record(&entry)?;
    snapshot.commit(&nation_report.gdp);
    snapshot::save(path, snapshot)?;
    if !quiet {
        eprintln!(
            "committed total_gdp {} (previous {}) to {}, ledger {}",
            snapshot.user.total_gdp,
            snapshot.user.previous_gdp,
            path.display(),
            gdp_ledger.path().display()
        );
    }
    Ok(())
}

fn run() -> Result<i32, NationError> {
    let cli = cli::Cli::parse();

    let loaded = config::load_config(&cli.root)?;
    let has_config = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    cfg.validate()?;
    telemetry::init(&telemetry::filter_directive(
        cli.verbose,
        cli.quiet,
        cfg.log_level(),
    ))?;
    if !has_config {
        tracing::debug!(root = %cli.root.display(), "no nation.toml found, using defaults");
    }
    let catalog = cfg.sector_catalog();

    match cli.command {
        cli::Commands::Init(cmd) => {
            let mut snapshot = if cmd.snapshot.exists() {
                snapshot::load(&cmd.snapshot)?
            } else {
                Snapshot::default()
            };
            let sectors = snapshot.catalog(&catalog).to_vec();
            let seeded = snapshot.seed_starting_sectors(&sectors);
            snapshot::save(&cmd.snapshot, &snapshot)?;
            println!(
                "seeded {} starting sectors into {}",
                seeded,
                cmd.snapshot.display()
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Score(cmd) => {
            let mut snapshot = snapshot::load(&cmd.snapshot)?;
            let sectors = snapshot.catalog(&catalog).to_vec();
            let nation_report = snapshot.report(&sectors);

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            let rendered = report::render(&nation_report, output_format)?;
            println!("{rendered}");

            if cmd.commit {
                commit_snapshot(
                    &cli.root,
                    &cfg,
                    &cmd.snapshot,
                    &mut snapshot,
                    &nation_report,
                    cli.quiet,
                )?;
            }

            Ok(exit_code::SUCCESS)
        }
        cli::Commands::UpdateScore(cmd) => {
            let mut snapshot = snapshot::load(&cmd.snapshot)?;
            let sectors = snapshot.catalog(&catalog).to_vec();
            snapshot.set_sector_score(cmd.sector, cmd.score)?;
            let nation_report = snapshot.report(&sectors);
            commit_snapshot(
                &cli.root,
                &cfg,
                &cmd.snapshot,
                &mut snapshot,
                &nation_report,
                cli.quiet,
            )?;
            println!(
                "sector {}: score {}, total_gdp {} ({})",
                cmd.sector,
                cmd.score,
                nation_report.gdp.total_gdp,
                nation_report.classification.classification
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Classify(cmd) => {
            let tier = NationTier::from_gdp(cmd.gdp);
            println!("{} {} ({})", tier.icon(), tier.name(), tier.name_ar());
            println!("color: {}", tier.color());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Unlock(cmd) => {
            let mut snapshot = snapshot::load(&cmd.snapshot)?;
            let sectors = snapshot.catalog(&catalog).to_vec();
            let request = snapshot.unlock_request(&sectors, cmd.sector)?;
            let decision = evaluate_unlock(&request);
            println!("sector {}: {}", cmd.sector, decision);

            if cmd.apply && snapshot.unlock_sector(&sectors, cmd.sector)? {
                snapshot::save(&cmd.snapshot, &snapshot)?;
                println!("sector {}: unlocked", cmd.sector);
            }

            if decision.is_eligible() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::INELIGIBLE)
            }
        }
        cli::Commands::NextLevel(cmd) => {
            let mut snapshot = snapshot::load(&cmd.snapshot)?;
            let from_level = snapshot.user.current_level;
            let status = if cmd.apply {
                snapshot.advance_level()
            } else {
                check_level_up(
                    snapshot.user.total_gdp,
                    snapshot.average_unlocked_score(),
                    from_level,
                )
            };
            match status {
                LevelUpStatus::MaxLevel => {
                    println!("level {from_level}: maximum level reached");
                    Ok(exit_code::SUCCESS)
                }
                LevelUpStatus::Pending {
                    requirements,
                    decision,
                } => {
                    println!(
                        "level {} requires gdp >= {} and average score >= {:.0}",
                        requirements.next_level,
                        requirements.required_gdp,
                        requirements.required_avg_score
                    );
                    println!("  {}", requirements.additional_requirements);
                    println!("status: {decision}");
                    if snapshot.user.current_level != from_level {
                        snapshot::save(&cmd.snapshot, &snapshot)?;
                        println!("advanced to level {}", snapshot.user.current_level);
                    }
                    if decision.is_eligible() {
                        Ok(exit_code::SUCCESS)
                    } else {
                        Ok(exit_code::INELIGIBLE)
                    }
                }
            }
        }
        cli::Commands::Sectors => {
            for sector in &catalog {
                println!(
                    "- {} {} (weight {:.2}, level {}){}",
                    sector.id,
                    sector.key,
                    f64::from(sector.weight) / 100.0,
                    sector.required_level,
                    sector
                        .unlock_condition
                        .as_deref()
                        .map(|condition| format!(" unlock: {condition}"))
                        .unwrap_or_default()
                );
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::History(cmd) => {
            let gdp_ledger = GdpLedger::new(&cli.root, Some(&cfg));
            let entries = gdp_ledger.history(cmd.limit)?;
            if entries.is_empty() {
                println!("no committed entries in {}", gdp_ledger.path().display());
            }
            for entry in &entries {
                println!(
                    "{} total_gdp {} ({:+}) {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.total_gdp,
                    entry.change(),
                    entry.classification
                );
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
