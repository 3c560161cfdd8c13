use crate::error::{NationError, Result};
use crate::types::config::NationConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "nation.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".nation/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/nation-index/config.toml";

/// Loads `nation.toml` under `root`, layered over the global file and under the
/// local override. Returns `None` when `root` has no `nation.toml`.
pub fn load_config(root: &Path) -> Result<Option<NationConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<NationConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let layers = global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([repo_path, root.join(DEFAULT_LOCAL_FILE)])
        .filter(|path| path.exists());

    let mut merged = Map::new();
    for path in layers {
        let layer = read_layer(&path)?;
        tracing::debug!(layer = %path.display(), "merging config layer");
        merge_layer(&mut merged, layer);
    }

    let cfg: NationConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| NationError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

fn read_layer(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| NationError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Later layers win. `[[sectors]]` entries are matched by `id`, so an override
/// can retune one sector without restating the catalog; unmatched ids are appended.
fn merge_layer(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        let Some(existing) = base.get_mut(&key) else {
            base.insert(key, value);
            continue;
        };
        match (key.as_str(), existing, value) {
            ("sectors", Value::Array(sectors), Value::Array(overrides)) => {
                merge_sectors(sectors, overrides);
            }
            (_, Value::Table(existing), Value::Table(table)) => merge_layer(existing, table),
            (_, slot, value) => *slot = value,
        }
    }
}

fn merge_sectors(sectors: &mut Vec<Value>, overrides: Vec<Value>) {
    for sector in overrides {
        let existing = sector_id(&sector).and_then(|id| {
            sectors
                .iter_mut()
                .find(|candidate| sector_id(candidate) == Some(id))
        });
        match (existing, sector) {
            (Some(Value::Table(existing)), Value::Table(fields)) => merge_layer(existing, fields),
            (Some(slot), sector) => *slot = sector,
            (None, sector) => sectors.push(sector),
        }
    }
}

fn sector_id(sector: &Value) -> Option<i64> {
    sector.get("id").and_then(Value::as_integer)
}
