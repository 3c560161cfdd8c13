use crate::engine::unlock::LevelRequirements;
use crate::types::scoring::{Classification, GdpBreakdown};
use crate::types::sector::UserState;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorLine {
    pub id: u32,
    pub key: String,
    pub name: String,
    pub weight: u32,
    pub required_level: u32,
    pub score: Option<u32>,
    pub is_unlocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationReport {
    pub user: UserState,
    pub gdp: GdpBreakdown,
    pub classification: Classification,
    pub average_score: f64,
    pub available_sectors: u32,
    pub sectors: Vec<SectorLine>,
    pub next_level: Option<LevelRequirements>,
}
