use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Weight applied when a progress entry points at a sector the catalog does not know.
pub const FALLBACK_WEIGHT: u32 = 100;

/// A life domain as stored in the catalog. `weight` is scaled x100 (150 means 1.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: u32,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_level")]
    pub required_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
    /// Stored columns the engine does not model, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sector {
    pub fn is_available_at(&self, level: u32) -> bool {
        self.required_level <= level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorProgress {
    pub sector_id: u32,
    pub score: u32,
    #[serde(default)]
    pub previous_score: u32,
    #[serde(default)]
    pub is_unlocked: bool,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub tasks_total: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SectorProgress {
    /// A fresh record for a sector the user has just gained access to.
    pub fn unlocked(sector_id: u32) -> Self {
        let mut progress = Self {
            sector_id,
            score: 0,
            previous_score: 0,
            is_unlocked: true,
            tasks_completed: 0,
            tasks_total: 0,
            extra: Map::new(),
        };
        progress.touch("unlockedAt");
        progress
    }

    /// Moves the current score into `previous_score` and stores `score`.
    pub fn record_score(&mut self, score: u32) {
        self.previous_score = self.score;
        self.score = score;
        self.touch("lastUpdated");
    }

    pub fn unlock(&mut self) {
        if !self.is_unlocked {
            self.is_unlocked = true;
            self.touch("unlockedAt");
        }
    }

    fn touch(&mut self, field: &str) {
        self.extra
            .insert(field.to_string(), Value::String(Utc::now().to_rfc3339()));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    #[serde(default)]
    pub total_gdp: i64,
    #[serde(default)]
    pub previous_gdp: i64,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default = "default_level")]
    pub current_level: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            total_gdp: 0,
            previous_gdp: 0,
            streak_days: 0,
            current_level: default_level(),
            extra: Map::new(),
        }
    }
}

impl UserState {
    /// Shifts the stored total into `previous_gdp` and records `total` as current.
    pub fn record_total(&mut self, total: i64) {
        self.previous_gdp = self.total_gdp;
        self.total_gdp = total;
    }
}

/// One engine input row: a sector's score joined with its catalog weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorScore {
    pub key: String,
    pub score: u32,
    pub weight: u32,
    pub is_unlocked: bool,
}

/// Threshold predicate gating a sector or level. Zero thresholds count as undeclared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
}

impl UnlockCondition {
    /// Decodes a stored condition payload. Blank input means "no condition".
    pub fn decode(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(raw)? {
            value @ Value::Object(_) => serde_json::from_value(value).map(Some),
            other => Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "unlock condition must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn declared_gdp_min(&self) -> Option<f64> {
        self.gdp_min.filter(|value| *value != 0.0)
    }

    pub fn declared_avg_score(&self) -> Option<f64> {
        self.avg_score.filter(|value| *value != 0.0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn default_weight() -> u32 {
    FALLBACK_WEIGHT
}

fn default_level() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_both_thresholds() {
        let condition = UnlockCondition::decode(r#"{"avgScore":70,"gdpMin":700}"#)
            .expect("condition should decode")
            .expect("condition should be present");
        assert_eq!(condition.declared_gdp_min(), Some(700.0));
        assert_eq!(condition.declared_avg_score(), Some(70.0));
    }

    #[test]
    fn decode_treats_blank_payload_as_absent() {
        assert_eq!(UnlockCondition::decode("  ").expect("blank decodes"), None);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let condition = UnlockCondition::decode(r#"{"gdpMin":500,"firstLogin":true}"#)
            .expect("condition should decode")
            .expect("condition should be present");
        assert_eq!(condition.declared_gdp_min(), Some(500.0));
        assert_eq!(condition.declared_avg_score(), None);
    }

    #[test]
    fn decode_rejects_non_object_payloads() {
        for raw in ["null", "[700, 70]", "\"gdpMin\"", "{gdpMin: 700"] {
            assert!(
                UnlockCondition::decode(raw).is_err(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn zero_thresholds_are_not_declared() {
        let condition = UnlockCondition {
            gdp_min: Some(0.0),
            avg_score: Some(0.0),
        };
        assert_eq!(condition.declared_gdp_min(), None);
        assert_eq!(condition.declared_avg_score(), None);
    }

    #[test]
    fn record_total_shifts_previous_value() {
        let mut user = UserState {
            total_gdp: 640,
            previous_gdp: 600,
            streak_days: 3,
            current_level: 1,
            extra: Map::new(),
        };
        user.record_total(702);
        assert_eq!(user.previous_gdp, 640);
        assert_eq!(user.total_gdp, 702);
    }

    #[test]
    fn user_state_defaults_missing_fields() {
        let user: UserState = serde_json::from_str("{}").expect("empty user should parse");
        assert_eq!(user.current_level, 1);
        assert_eq!(user.previous_gdp, 0);
        assert_eq!(user.streak_days, 0);
    }

    #[test]
    fn record_score_shifts_previous_score() {
        let mut progress = SectorProgress::unlocked(2);
        assert_eq!(progress.score, 0);
        assert!(progress.extra.contains_key("unlockedAt"));

        progress.record_score(65);
        progress.record_score(72);
        assert_eq!(progress.previous_score, 65);
        assert_eq!(progress.score, 72);
        assert!(progress.extra.contains_key("lastUpdated"));
    }

    #[test]
    fn unmodelled_fields_survive_a_round_trip() {
        let raw = r#"{"id":7,"name":"Amal","totalGdp":640,"currentLevel":2}"#;
        let user: UserState = serde_json::from_str(raw).expect("user should parse");
        assert_eq!(user.current_level, 2);
        assert_eq!(user.extra.get("name"), Some(&Value::from("Amal")));

        let written = serde_json::to_value(&user).expect("user should serialize");
        assert_eq!(written["id"], 7);
        assert_eq!(written["name"], "Amal");
        assert_eq!(written["totalGdp"], 640);
    }
}
