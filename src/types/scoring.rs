use serde::Serialize;

pub type Gdp = i64;

/// Output of one national GDP computation. Every component stays inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GdpBreakdown {
    pub total_gdp: Gdp,
    pub base_gdp: Gdp,
    pub growth_bonus: Gdp,
    pub streak_bonus: Gdp,
    pub diversity_bonus: Gdp,
    /// Percentage change of the base index over the previous total, one decimal.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub classification: &'static str,
    pub classification_ar: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}
