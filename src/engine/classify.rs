use crate::types::scoring::{Classification, Gdp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NationTier {
    Struggling,
    Emerging,
    Developing,
    Advanced,
    Outstanding,
    Superpower,
}

/// Inclusive lower bounds, highest first. Anything below the last entry is `Struggling`.
pub const TIER_THRESHOLDS: [(Gdp, NationTier); 5] = [
    (1000, NationTier::Superpower),
    (901, NationTier::Outstanding),
    (751, NationTier::Advanced),
    (601, NationTier::Developing),
    (401, NationTier::Emerging),
];

impl NationTier {
    pub fn from_gdp(gdp: Gdp) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(threshold, _)| gdp >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(NationTier::Struggling)
    }

    pub fn name(self) -> &'static str {
        match self {
            NationTier::Superpower => "Superpower",
            NationTier::Outstanding => "Outstanding Nation",
            NationTier::Advanced => "Advanced Nation",
            NationTier::Developing => "Developing Nation",
            NationTier::Emerging => "Emerging Nation",
            NationTier::Struggling => "Struggling Nation",
        }
    }

    pub fn name_ar(self) -> &'static str {
        match self {
            NationTier::Superpower => "دولة عظمى",
            NationTier::Outstanding => "دولة متفوقة",
            NationTier::Advanced => "دولة متقدمة",
            NationTier::Developing => "دولة نامية",
            NationTier::Emerging => "دولة ناشئة",
            NationTier::Struggling => "دولة متعثرة",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NationTier::Superpower => "#FFD700",
            NationTier::Outstanding => "#9B59B6",
            NationTier::Advanced => "#3498DB",
            NationTier::Developing => "#2ECC71",
            NationTier::Emerging => "#F39C12",
            NationTier::Struggling => "#E74C3C",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NationTier::Superpower => "👑",
            NationTier::Outstanding => "⭐",
            NationTier::Advanced => "🏛️",
            NationTier::Developing => "🏗️",
            NationTier::Emerging => "🌱",
            NationTier::Struggling => "🚨",
        }
    }

    pub fn classification(self) -> Classification {
        Classification {
            classification: self.name(),
            classification_ar: self.name_ar(),
            color: self.color(),
            icon: self.icon(),
        }
    }
}

pub fn classify_nation(gdp: Gdp) -> Classification {
    NationTier::from_gdp(gdp).classification()
}
