use crate::error::NationError;
use crate::types::sector::{Sector, UnlockCondition};
use serde::Deserialize;
use serde_json::Map;
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NationConfig {
    pub sectors: Option<Vec<SectorConfig>>,
    pub ledger: Option<LedgerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorConfig {
    pub id: u32,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub unlock_condition: Option<String>,
}

fn default_weight() -> u32 {
    100
}

fn default_required_level() -> u32 {
    1
}

impl SectorConfig {
    fn to_sector(&self) -> Sector {
        Sector {
            id: self.id,
            key: self.key.clone(),
            name: self.name.clone(),
            weight: self.weight,
            required_level: self.required_level,
            unlock_condition: self.unlock_condition.clone(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub path: Option<String>,
    pub max_entries: Option<u32>,
    pub retained_logs: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

pub const DEFAULT_LOG_LEVEL: &str = "warn";

impl NationConfig {
    /// Configured sectors, or the built-in catalog when none are declared.
    pub fn sector_catalog(&self) -> Vec<Sector> {
        match &self.sectors {
            Some(sectors) => sectors.iter().map(SectorConfig::to_sector).collect(),
            None => default_sector_catalog(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn validate(&self) -> Result<(), NationError> {
        if let Some(sectors) = &self.sectors {
            validate_sectors(sectors)?;
        }

        if let Some(ledger) = &self.ledger {
            if ledger.retained_logs == Some(0) {
                return Err(NationError::ConfigParse(
                    "ledger.retained_logs must be greater than 0".to_string(),
                ));
            }
            if ledger.max_entries == Some(0) {
                return Err(NationError::ConfigParse(
                    "ledger.max_entries must be greater than 0".to_string(),
                ));
            }
            if ledger
                .path
                .as_ref()
                .is_some_and(|path| path.trim().is_empty())
            {
                return Err(NationError::ConfigParse(
                    "ledger.path must not be empty".to_string(),
                ));
            }
        }

        let level = self.log_level();
        if EnvFilter::try_new(level).is_err() {
            return Err(NationError::ConfigParse(format!(
                "logging.level is not a valid filter: {level}"
            )));
        }

        Ok(())
    }
}

fn validate_sectors(sectors: &[SectorConfig]) -> Result<(), NationError> {
    if sectors.is_empty() {
        return Err(NationError::ConfigParse(
            "sectors must declare at least one sector".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    let mut keys = HashSet::new();
    for sector in sectors {
        let key = sector.key.trim();
        if key.is_empty() {
            return Err(NationError::ConfigParse(format!(
                "sector {} must have a non-empty key",
                sector.id
            )));
        }
        if !ids.insert(sector.id) {
            return Err(NationError::ConfigParse(format!(
                "sectors contains duplicate id: {}",
                sector.id
            )));
        }
        if !keys.insert(key.to_string()) {
            return Err(NationError::ConfigParse(format!(
                "sectors contains duplicate key: {key}"
            )));
        }
        if sector.weight == 0 {
            return Err(NationError::ConfigParse(format!(
                "sector '{key}' weight must be greater than 0"
            )));
        }
        if sector.required_level == 0 {
            return Err(NationError::ConfigParse(format!(
                "sector '{key}' required_level must be at least 1"
            )));
        }
        if let Some(raw) = &sector.unlock_condition {
            UnlockCondition::decode(raw).map_err(|e| {
                NationError::ConfigParse(format!("sector '{key}' unlock_condition: {e}"))
            })?;
        }
    }

    Ok(())
}

const LEVEL_TWO_CONDITION: &str = r#"{"avgScore":70,"gdpMin":700}"#;
const LEVEL_THREE_CONDITION: &str = r#"{"avgScore":80,"gdpMin":850}"#;

/// The nine sectors every new nation starts from.
pub fn default_sector_catalog() -> Vec<Sector> {
    [
        (1, "infrastructure", "Infrastructure", 150, 1, None),
        (2, "health", "Health", 130, 1, None),
        (3, "economy", "National Economy", 120, 1, None),
        (4, "education", "Education & Development", 110, 2, Some(LEVEL_TWO_CONDITION)),
        (5, "defense", "Defense", 120, 2, Some(LEVEL_TWO_CONDITION)),
        (6, "career", "Career", 110, 2, Some(LEVEL_TWO_CONDITION)),
        (7, "relations", "Relations & Family", 100, 3, Some(LEVEL_THREE_CONDITION)),
        (8, "creativity", "Creativity & Hobbies", 90, 3, Some(LEVEL_THREE_CONDITION)),
        (9, "spirituality", "Spirituality", 90, 3, Some(LEVEL_THREE_CONDITION)),
    ]
    .into_iter()
    .map(|(id, key, name, weight, required_level, condition)| Sector {
        id,
        key: key.to_string(),
        name: name.to_string(),
        weight,
        required_level,
        unlock_condition: condition.map(str::to_string),
        extra: Map::new(),
    })
    .collect()
}
