use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nation-index",
    version,
    about = "National index scoring for life-sector progress"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding nation.toml and the ledger
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed a snapshot with the starting sectors
    Init(InitCommand),
    /// Compute the national GDP for a snapshot
    Score(ScoreCommand),
    /// Record a new sector score and commit the recomputed GDP
    UpdateScore(UpdateScoreCommand),
    /// Map a GDP value to its tier
    Classify(ClassifyCommand),
    /// Check whether a sector can be unlocked
    Unlock(UnlockCommand),
    /// Show next level requirements and progress
    NextLevel(NextLevelCommand),
    /// List the configured sector catalog
    Sectors,
    /// Show committed GDP entries from the ledger
    History(HistoryCommand),
}

#[derive(Args)]
pub struct InitCommand {
    pub snapshot: PathBuf,
}

#[derive(Args)]
pub struct ScoreCommand {
    pub snapshot: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Write the new total back to the snapshot and append it to the ledger
    #[arg(long)]
    pub commit: bool,
}

#[derive(Args)]
pub struct UpdateScoreCommand {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub sector: u32,
    /// New score, 0-100
    #[arg(long)]
    pub score: u32,
}

#[derive(Args)]
pub struct ClassifyCommand {
    #[arg(allow_negative_numbers = true)]
    pub gdp: i64,
}

#[derive(Args)]
pub struct UnlockCommand {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub sector: u32,
    /// Unlock the sector in the snapshot when eligible
    #[arg(long)]
    pub apply: bool,
}

#[derive(Args)]
pub struct NextLevelCommand {
    pub snapshot: PathBuf,
    /// Move the user to the next level when eligible
    #[arg(long)]
    pub apply: bool,
}

#[derive(Args)]
pub struct HistoryCommand {
    /// Show only the newest N entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
