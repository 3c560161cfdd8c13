use crate::types::scoring::Gdp;
use crate::types::sector::UnlockCondition;
use serde::Serialize;
use std::fmt;

/// Inputs for a sector or level unlock decision.
#[derive(Debug, Clone, Copy)]
pub struct UnlockRequest<'a> {
    pub current_gdp: Gdp,
    /// Mean score over the user's unlocked sectors.
    pub avg_score: f64,
    pub required_level: u32,
    pub user_level: u32,
    /// Raw stored condition payload, if the target declares one.
    pub unlock_condition: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum UnlockDecision {
    Eligible,
    LevelTooLow { required_level: u32, user_level: u32 },
    BelowGdpMin { required: f64, actual: Gdp },
    BelowAvgScore { required: f64, actual: f64 },
    MalformedCondition { reason: String },
}

impl UnlockDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, UnlockDecision::Eligible)
    }
}

impl fmt::Display for UnlockDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockDecision::Eligible => write!(f, "eligible"),
            UnlockDecision::LevelTooLow {
                required_level,
                user_level,
            } => write!(
                f,
                "level too low: requires level {required_level}, user is level {user_level}"
            ),
            UnlockDecision::BelowGdpMin { required, actual } => {
                write!(f, "gdp below minimum: requires {required}, has {actual}")
            }
            UnlockDecision::BelowAvgScore { required, actual } => write!(
                f,
                "average score below minimum: requires {required}, has {actual:.1}"
            ),
            UnlockDecision::MalformedCondition { reason } => {
                write!(f, "malformed unlock condition: {reason}")
            }
        }
    }
}

/// Decides whether a target may be unlocked. Malformed conditions fail closed.
pub fn evaluate_unlock(request: &UnlockRequest<'_>) -> UnlockDecision {
    if request.user_level < request.required_level {
        return UnlockDecision::LevelTooLow {
            required_level: request.required_level,
            user_level: request.user_level,
        };
    }

    let Some(raw) = request.unlock_condition else {
        return UnlockDecision::Eligible;
    };

    match UnlockCondition::decode(raw) {
        Ok(Some(condition)) => {
            evaluate_condition(&condition, request.current_gdp, request.avg_score)
        }
        Ok(None) => UnlockDecision::Eligible,
        Err(error) => {
            tracing::warn!(condition = raw, error = %error, "failed to decode unlock condition");
            UnlockDecision::MalformedCondition {
                reason: error.to_string(),
            }
        }
    }
}

pub fn can_unlock_sector(request: &UnlockRequest<'_>) -> bool {
    evaluate_unlock(request).is_eligible()
}

fn evaluate_condition(
    condition: &UnlockCondition,
    current_gdp: Gdp,
    avg_score: f64,
) -> UnlockDecision {
    if let Some(required) = condition.declared_gdp_min() {
        if (current_gdp as f64) < required {
            return UnlockDecision::BelowGdpMin {
                required,
                actual: current_gdp,
            };
        }
    }
    if let Some(required) = condition.declared_avg_score() {
        if avg_score < required {
            return UnlockDecision::BelowAvgScore {
                required,
                actual: avg_score,
            };
        }
    }
    UnlockDecision::Eligible
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequirements {
    pub next_level: u32,
    pub required_gdp: Gdp,
    pub required_avg_score: f64,
    pub additional_requirements: &'static str,
}

impl LevelRequirements {
    pub fn condition(&self) -> UnlockCondition {
        UnlockCondition {
            gdp_min: Some(self.required_gdp as f64),
            avg_score: Some(self.required_avg_score),
        }
    }
}

/// Requirements to leave `current_level`, or `None` at the top level.
pub fn next_level_requirements(current_level: u32) -> Option<LevelRequirements> {
    match current_level {
        1 => Some(LevelRequirements {
            next_level: 2,
            required_gdp: 700,
            required_avg_score: 70.0,
            additional_requirements: "Reach 70%+ in every core sector",
        }),
        2 => Some(LevelRequirements {
            next_level: 3,
            required_gdp: 850,
            required_avg_score: 80.0,
            additional_requirements: "Reach 80%+ in every unlocked sector",
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LevelUpStatus {
    MaxLevel,
    Pending {
        requirements: LevelRequirements,
        decision: UnlockDecision,
    },
}

/// Level progression goes through the same threshold check as sector unlocks.
pub fn check_level_up(current_gdp: Gdp, avg_score: f64, current_level: u32) -> LevelUpStatus {
    let Some(requirements) = next_level_requirements(current_level) else {
        return LevelUpStatus::MaxLevel;
    };
    let decision = evaluate_condition(&requirements.condition(), current_gdp, avg_score);
    LevelUpStatus::Pending {
        requirements,
        decision,
    }
}
