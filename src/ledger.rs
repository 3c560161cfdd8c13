use crate::error::{NationError, Result};
use crate::types::config::NationConfig;
use crate::types::scoring::{Classification, Gdp, GdpBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_LEDGER_FILE: &str = ".nation/ledger.jsonl";
pub const DEFAULT_MAX_ENTRIES: usize = 500;
pub const DEFAULT_RETAINED_LOGS: usize = 3;

/// One committed GDP computation, stored as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub total_gdp: Gdp,
    pub previous_gdp: Gdp,
    pub base_gdp: Gdp,
    pub growth_bonus: Gdp,
    pub streak_bonus: Gdp,
    pub diversity_bonus: Gdp,
    pub growth_rate: f64,
    pub classification: String,
}

impl LedgerEntry {
    pub fn new(result: &GdpBreakdown, previous_gdp: Gdp, classification: &Classification) -> Self {
        Self {
            timestamp: Utc::now(),
            total_gdp: result.total_gdp,
            previous_gdp,
            base_gdp: result.base_gdp,
            growth_bonus: result.growth_bonus,
            streak_bonus: result.streak_bonus,
            diversity_bonus: result.diversity_bonus,
            growth_rate: result.growth_rate,
            classification: classification.classification.to_string(),
        }
    }

    pub fn change(&self) -> Gdp {
        self.total_gdp - self.previous_gdp
    }
}

#[derive(Debug, Clone)]
struct LedgerSettings {
    path: PathBuf,
    max_entries: usize,
    retained_logs: usize,
}

/// Append-only history of committed GDP computations.
///
/// The live file holds at most `max_entries` lines. When full it becomes
/// `<stem>.1.<ext>`, older generations shift up by one, and anything past
/// `retained_logs` generations is dropped.
pub struct GdpLedger {
    settings: LedgerSettings,
}

impl GdpLedger {
    pub fn new(root: &Path, cfg: Option<&NationConfig>) -> Self {
        Self {
            settings: resolve_settings(root, cfg),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings.path
    }

    pub fn record(&self, entry: &LedgerEntry) -> Result<()> {
        if let Some(parent) = self.settings.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if self.live_entry_count()? >= self.settings.max_entries {
            self.rotate()?;
        }

        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.settings.path)?;
        writeln!(file, "{line}")?;
        file.flush()?;
        tracing::debug!(
            total_gdp = entry.total_gdp,
            ledger = %self.settings.path.display(),
            "recorded ledger entry"
        );
        Ok(())
    }

    /// Most recent entries last, reading rotated generations before the live file.
    /// `limit` keeps only the newest entries.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for generation in (1..=self.settings.retained_logs).rev() {
            entries.extend(read_entries(&self.generation_path(generation))?);
        }
        entries.extend(read_entries(&self.settings.path)?);

        if let Some(limit) = limit {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }
        Ok(entries)
    }

    fn live_entry_count(&self) -> Result<usize> {
        match std::fs::read_to_string(&self.settings.path) {
            Ok(content) => Ok(content.lines().filter(|line| !line.trim().is_empty()).count()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(error) => Err(NationError::Io(error)),
        }
    }

    fn rotate(&self) -> Result<()> {
        let oldest = self.generation_path(self.settings.retained_logs);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }
        for generation in (1..self.settings.retained_logs).rev() {
            let from = self.generation_path(generation);
            if from.exists() {
                std::fs::rename(&from, self.generation_path(generation + 1))?;
            }
        }
        let rotated = self.generation_path(1);
        std::fs::rename(&self.settings.path, &rotated)?;
        tracing::info!(rotated = %rotated.display(), "rotated gdp ledger");
        Ok(())
    }

    fn generation_path(&self, generation: usize) -> PathBuf {
        let path = &self.settings.path;
        let stem = path
            .file_stem()
            .and_then(|value| value.to_str())
            .unwrap_or("ledger");
        let name = match path.extension().and_then(|value| value.to_str()) {
            Some(extension) => format!("{stem}.{generation}.{extension}"),
            None => format!("{stem}.{generation}"),
        };
        path.with_file_name(name)
    }
}

fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(NationError::Io(error)),
    };
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                NationError::LedgerParse(format!("{}:{}: {}", path.display(), index + 1, e))
            })
        })
        .collect()
}

fn resolve_settings(root: &Path, cfg: Option<&NationConfig>) -> LedgerSettings {
    let ledger = cfg.and_then(|value| value.ledger.as_ref());
    let path_rel = ledger
        .and_then(|value| value.path.as_ref())
        .map_or(DEFAULT_LEDGER_FILE, String::as_str);
    let max_entries = ledger
        .and_then(|value| value.max_entries)
        .map_or(DEFAULT_MAX_ENTRIES, |value| value as usize)
        .max(1);
    let retained_logs = ledger
        .and_then(|value| value.retained_logs)
        .map_or(DEFAULT_RETAINED_LOGS, |value| value as usize)
        .max(1);

    LedgerSettings {
        path: resolve_path(root, path_rel),
        max_entries,
        retained_logs,
    }
}

fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        candidate
    } else {
        root.join(candidate)
    }
}
