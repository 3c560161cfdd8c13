//! Caller side of the engine: read a stored snapshot, join progress with the
//! sector catalog, score it, and write the new total back.

use crate::engine::classify::classify_nation;
use crate::engine::unlock::{
    can_unlock_sector, check_level_up, next_level_requirements, LevelUpStatus, UnlockRequest,
};
use crate::engine::{calculate_national_gdp, GdpInputs};
use crate::error::{NationError, Result};
use crate::types::report::{NationReport, SectorLine};
use crate::types::scoring::GdpBreakdown;
use crate::types::sector::{Sector, SectorProgress, SectorScore, UserState, FALLBACK_WEIGHT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<Sector>>,
    #[serde(default)]
    pub progress: Vec<SectorProgress>,
    #[serde(default)]
    pub user: UserState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn load(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(NationError::SnapshotNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| NationError::SnapshotParse(format!("{}: {}", path.display(), e)))
}

/// Rewrites the snapshot through a sibling temp file and a rename.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl Snapshot {
    /// Sectors carried by the snapshot, falling back to the configured catalog.
    pub fn catalog<'a>(&'a self, fallback: &'a [Sector]) -> &'a [Sector] {
        self.sectors.as_deref().unwrap_or(fallback)
    }

    pub fn sector_scores(&self, catalog: &[Sector]) -> Vec<SectorScore> {
        self.progress
            .iter()
            .map(|progress| {
                let sector = catalog.iter().find(|sector| sector.id == progress.sector_id);
                SectorScore {
                    key: sector.map(|sector| sector.key.clone()).unwrap_or_default(),
                    score: progress.score,
                    weight: sector.map_or(FALLBACK_WEIGHT, |sector| sector.weight),
                    is_unlocked: progress.is_unlocked,
                }
            })
            .collect()
    }

    pub fn available_sector_count(&self, catalog: &[Sector]) -> u32 {
        catalog
            .iter()
            .filter(|sector| sector.is_available_at(self.user.current_level))
            .count() as u32
    }

    /// Mean score over unlocked sectors; 0.0 when nothing is unlocked.
    pub fn average_unlocked_score(&self) -> f64 {
        let unlocked = self
            .progress
            .iter()
            .filter(|progress| progress.is_unlocked)
            .map(|progress| f64::from(progress.score))
            .collect::<Vec<_>>();
        if unlocked.is_empty() {
            return 0.0;
        }
        unlocked.iter().sum::<f64>() / unlocked.len() as f64
    }

    pub fn score(&self, catalog: &[Sector]) -> GdpBreakdown {
        let sectors = self.sector_scores(catalog);
        calculate_national_gdp(&GdpInputs {
            sectors: &sectors,
            previous_gdp: self.user.previous_gdp,
            streak_days: self.user.streak_days,
            total_available_sectors: self.available_sector_count(catalog),
        })
    }

    pub fn report(&self, catalog: &[Sector]) -> NationReport {
        let gdp = self.score(catalog);
        let sectors = catalog
            .iter()
            .map(|sector| {
                let progress = self
                    .progress
                    .iter()
                    .find(|progress| progress.sector_id == sector.id);
                SectorLine {
                    id: sector.id,
                    key: sector.key.clone(),
                    name: sector.name.clone(),
                    weight: sector.weight,
                    required_level: sector.required_level,
                    score: progress.map(|progress| progress.score),
                    is_unlocked: progress.is_some_and(|progress| progress.is_unlocked),
                }
            })
            .collect();

        NationReport {
            user: self.user.clone(),
            classification: classify_nation(gdp.total_gdp),
            gdp,
            average_score: self.average_unlocked_score(),
            available_sectors: self.available_sector_count(catalog),
            sectors,
            next_level: next_level_requirements(self.user.current_level),
        }
    }

    /// Unlock request for `sector_id` using the user's stored total and average score.
    pub fn unlock_request<'a>(
        &self,
        catalog: &'a [Sector],
        sector_id: u32,
    ) -> Result<UnlockRequest<'a>> {
        let sector = catalog
            .iter()
            .find(|sector| sector.id == sector_id)
            .ok_or(NationError::UnknownSector(sector_id))?;
        Ok(UnlockRequest {
            current_gdp: self.user.total_gdp,
            avg_score: self.average_unlocked_score(),
            required_level: sector.required_level,
            user_level: self.user.current_level,
            unlock_condition: sector.unlock_condition.as_deref(),
        })
    }

    /// Records a new score for a tracked sector, keeping the old one as `previous_score`.
    pub fn set_sector_score(&mut self, sector_id: u32, score: u32) -> Result<()> {
        if score > MAX_SCORE {
            return Err(NationError::InvalidScore(score));
        }
        let progress = self
            .progress
            .iter_mut()
            .find(|progress| progress.sector_id == sector_id)
            .ok_or(NationError::SectorNotTracked(sector_id))?;
        progress.record_score(score);
        tracing::info!(
            sector_id,
            score,
            previous = progress.previous_score,
            "sector score updated"
        );
        Ok(())
    }

    /// Unlocks `sector_id` when the eligibility check passes. Returns whether it did.
    pub fn unlock_sector(&mut self, catalog: &[Sector], sector_id: u32) -> Result<bool> {
        let request = self.unlock_request(catalog, sector_id)?;
        if !can_unlock_sector(&request) {
            return Ok(false);
        }
        self.grant_sector(sector_id);
        Ok(true)
    }

    fn grant_sector(&mut self, sector_id: u32) {
        match self
            .progress
            .iter_mut()
            .find(|progress| progress.sector_id == sector_id)
        {
            Some(progress) => progress.unlock(),
            None => self.progress.push(SectorProgress::unlocked(sector_id)),
        }
        tracing::info!(sector_id, "sector unlocked");
    }

    /// Evaluates the next level and moves the user up when its thresholds hold.
    pub fn advance_level(&mut self) -> LevelUpStatus {
        let status = check_level_up(
            self.user.total_gdp,
            self.average_unlocked_score(),
            self.user.current_level,
        );
        if let LevelUpStatus::Pending {
            requirements,
            decision,
        } = &status
        {
            if decision.is_eligible() {
                self.user.current_level = requirements.next_level;
                tracing::info!(level = self.user.current_level, "level advanced");
            }
        }
        status
    }

    /// Gives a new user every level-1 sector, unlocked at score 0. Returns how many were added.
    pub fn seed_starting_sectors(&mut self, catalog: &[Sector]) -> usize {
        let mut seeded = 0;
        for sector in catalog.iter().filter(|sector| sector.required_level == 1) {
            if self
                .progress
                .iter()
                .any(|progress| progress.sector_id == sector.id)
            {
                continue;
            }
            self.progress.push(SectorProgress::unlocked(sector.id));
            seeded += 1;
        }
        seeded
    }

    /// Shifts the stored total to `previous_gdp` and records the new one.
    pub fn commit(&mut self, result: &GdpBreakdown) {
        self.user.record_total(result.total_gdp);
        tracing::info!(
            total_gdp = self.user.total_gdp,
            previous_gdp = self.user.previous_gdp,
            "committed national gdp"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::default_sector_catalog;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
  "progress": [
    { "sectorId": 1, "score": 80, "isUnlocked": true },
    { "sectorId": 2, "score": 70, "isUnlocked": true },
    { "sectorId": 3, "score": 90, "isUnlocked": true }
  ],
  "user": { "totalGdp": 640, "previousGdp": 600, "streakDays": 10, "currentLevel": 1 }
}"#;

    fn snapshot() -> Snapshot {
        serde_json::from_str(SNAPSHOT).expect("snapshot should parse")
    }

    #[test]
    fn scores_against_builtin_catalog() {
        let catalog = default_sector_catalog();
        let snapshot = snapshot();
        assert_eq!(snapshot.available_sector_count(&catalog), 3);

        let result = snapshot.score(&catalog);
        assert_eq!(result.base_gdp, 798);
        assert_eq!(result.total_gdp, 934);
    }

    #[test]
    fn unknown_sector_gets_fallback_weight() {
        let mut snapshot = snapshot();
        snapshot.progress.push(SectorProgress {
            sector_id: 99,
            score: 10,
            previous_score: 0,
            is_unlocked: true,
            tasks_completed: 0,
            tasks_total: 0,
            extra: Map::new(),
        });
        let scores = snapshot.sector_scores(&default_sector_catalog());
        let orphan = scores.last().expect("orphan should be scored");
        assert_eq!(orphan.weight, FALLBACK_WEIGHT);
        assert_eq!(orphan.key, "");
    }

    #[test]
    fn snapshot_sectors_override_catalog() {
        let mut snapshot = snapshot();
        snapshot.sectors = Some(vec![Sector {
            id: 1,
            key: "only".to_string(),
            name: String::new(),
            weight: 100,
            required_level: 1,
            unlock_condition: None,
            extra: Map::new(),
        }]);
        let fallback = default_sector_catalog();
        assert_eq!(snapshot.catalog(&fallback).len(), 1);
        assert_eq!(snapshot.available_sector_count(snapshot.catalog(&fallback)), 1);
    }

    #[test]
    fn average_score_counts_only_unlocked_sectors() {
        let mut snapshot = snapshot();
        snapshot.progress[2].is_unlocked = false;
        assert_eq!(snapshot.average_unlocked_score(), 75.0);

        for progress in &mut snapshot.progress {
            progress.is_unlocked = false;
        }
        assert_eq!(snapshot.average_unlocked_score(), 0.0);
    }

    #[test]
    fn unlock_request_uses_sector_gate() {
        let catalog = default_sector_catalog();
        let mut snapshot = snapshot();
        let request = snapshot
            .unlock_request(&catalog, 4)
            .expect("education should exist");
        assert_eq!(request.required_level, 2);
        assert!(!can_unlock_sector(&request));

        snapshot.user.current_level = 2;
        snapshot.user.total_gdp = 760;
        let request = snapshot
            .unlock_request(&catalog, 4)
            .expect("education should exist");
        assert!(can_unlock_sector(&request));

        assert!(matches!(
            snapshot.unlock_request(&catalog, 42),
            Err(NationError::UnknownSector(42))
        ));
    }

    #[test]
    fn commit_round_trips_through_disk() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("nation.json");
        std::fs::write(&path, SNAPSHOT).expect("snapshot should write");

        let catalog = default_sector_catalog();
        let mut snapshot = load(&path).expect("snapshot should load");
        let result = snapshot.score(&catalog);
        snapshot.commit(&result);
        save(&path, &snapshot).expect("snapshot should save");

        let reloaded = load(&path).expect("snapshot should reload");
        assert_eq!(reloaded.user.previous_gdp, 640);
        assert_eq!(reloaded.user.total_gdp, 934);
        assert!(reloaded.sectors.is_none());
        assert!(!dir.path().join("nation.json.tmp").exists());
    }

    #[test]
    fn commit_keeps_fields_the_engine_does_not_model() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("nation.json");
        std::fs::write(
            &path,
            r#"{
  "schemaVersion": 2,
  "progress": [
    { "sectorId": 1, "score": 80, "isUnlocked": true, "lastUpdated": "2024-03-01", "targetScore": 80 }
  ],
  "user": { "id": 7, "name": "Amal", "totalGdp": 640, "previousGdp": 600, "currentLevel": 1 }
}"#,
        )
        .expect("snapshot should write");

        let catalog = default_sector_catalog();
        let mut snapshot = load(&path).expect("snapshot should load");
        let result = snapshot.score(&catalog);
        snapshot.commit(&result);
        save(&path, &snapshot).expect("snapshot should save");

        let after: Value = serde_json::from_str(
            &std::fs::read_to_string(&path).expect("snapshot should read"),
        )
        .expect("snapshot should stay json");
        assert_eq!(after["schemaVersion"], 2);
        assert_eq!(after["user"]["id"], 7);
        assert_eq!(after["user"]["name"], "Amal");
        assert_eq!(after["user"]["previousGdp"], 640);
        assert_eq!(after["progress"][0]["lastUpdated"], "2024-03-01");
        assert_eq!(after["progress"][0]["targetScore"], 80);
    }

    #[test]
    fn set_sector_score_shifts_previous_and_rescoring_follows() {
        let catalog = default_sector_catalog();
        let mut snapshot = snapshot();
        snapshot
            .set_sector_score(3, 50)
            .expect("economy score should update");
        assert_eq!(snapshot.progress[2].previous_score, 90);
        assert_eq!(snapshot.progress[2].score, 50);
        // (80*150 + 70*130 + 50*120) * 10 / 400 = 677.5
        assert_eq!(snapshot.score(&catalog).base_gdp, 678);
    }

    #[test]
    fn set_sector_score_rejects_untracked_and_out_of_range() {
        let mut snapshot = snapshot();
        assert!(matches!(
            snapshot.set_sector_score(4, 50),
            Err(NationError::SectorNotTracked(4))
        ));
        assert!(matches!(
            snapshot.set_sector_score(1, 101),
            Err(NationError::InvalidScore(101))
        ));
        assert_eq!(snapshot.progress[0].score, 80);
    }

    #[test]
    fn unlock_sector_is_gated_and_creates_missing_rows() {
        let catalog = default_sector_catalog();
        let mut snapshot = snapshot();
        assert!(!snapshot
            .unlock_sector(&catalog, 4)
            .expect("education should exist"));
        assert_eq!(snapshot.progress.len(), 3);

        snapshot.user.current_level = 2;
        snapshot.user.total_gdp = 760;
        assert!(snapshot
            .unlock_sector(&catalog, 4)
            .expect("education should exist"));
        let education = snapshot
            .progress
            .iter()
            .find(|progress| progress.sector_id == 4)
            .expect("education row should be created");
        assert!(education.is_unlocked);
        assert_eq!(education.score, 0);
    }

    #[test]
    fn unlock_sector_flips_existing_locked_row() {
        let catalog = default_sector_catalog();
        let mut snapshot = snapshot();
        snapshot.progress[1].is_unlocked = false;
        assert!(snapshot
            .unlock_sector(&catalog, 2)
            .expect("health should exist"));
        assert!(snapshot.progress[1].is_unlocked);
        assert_eq!(snapshot.progress[1].score, 70);
        assert_eq!(snapshot.progress.len(), 3);
    }

    #[test]
    fn advance_level_only_moves_when_eligible() {
        let mut snapshot = snapshot();
        assert!(matches!(
            snapshot.advance_level(),
            LevelUpStatus::Pending { .. }
        ));
        assert_eq!(snapshot.user.current_level, 1);

        snapshot.user.total_gdp = 934;
        snapshot.advance_level();
        assert_eq!(snapshot.user.current_level, 2);

        snapshot.user.total_gdp = 2000;
        snapshot.user.current_level = 3;
        assert_eq!(snapshot.advance_level(), LevelUpStatus::MaxLevel);
        assert_eq!(snapshot.user.current_level, 3);
    }

    #[test]
    fn seeding_adds_only_missing_level_one_sectors() {
        let catalog = default_sector_catalog();
        let mut fresh = Snapshot::default();
        assert_eq!(fresh.seed_starting_sectors(&catalog), 3);
        assert!(fresh.progress.iter().all(|progress| progress.is_unlocked));
        assert_eq!(fresh.user.current_level, 1);
        assert_eq!(fresh.seed_starting_sectors(&catalog), 0);

        let mut partial = snapshot();
        partial.progress.remove(1);
        assert_eq!(partial.seed_starting_sectors(&catalog), 1);
        assert_eq!(partial.progress.len(), 3);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("missing.json");
        assert!(matches!(load(&missing), Err(NationError::SnapshotNotFound(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"user\":").expect("broken snapshot should write");
        assert!(matches!(load(&broken), Err(NationError::SnapshotParse(_))));
    }
}
