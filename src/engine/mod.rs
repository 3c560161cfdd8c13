//! National index engine.
//!
//! Pure functions over caller-supplied snapshots. Nothing in here performs I/O or
//! holds state, so every entry point is safe to call from any thread and returns
//! identical output for identical input.

pub mod base;
pub mod bonus;
pub mod classify;
pub mod unlock;

use crate::types::scoring::{Gdp, GdpBreakdown};
use crate::types::sector::SectorScore;

/// Everything the aggregator needs for one computation.
#[derive(Debug, Clone, Copy)]
pub struct GdpInputs<'a> {
    pub sectors: &'a [SectorScore],
    pub previous_gdp: Gdp,
    pub streak_days: u32,
    /// Sectors whose required level is at or below the user's level.
    pub total_available_sectors: u32,
}

pub fn calculate_national_gdp(inputs: &GdpInputs<'_>) -> GdpBreakdown {
    for sector in inputs.sectors.iter().filter(|sector| sector.is_unlocked) {
        tracing::trace!(
            sector = %sector.key,
            score = sector.score,
            weight = sector.weight,
            "active sector"
        );
    }

    let base_gdp = base::calculate_base_gdp(inputs.sectors);
    let growth_bonus = bonus::calculate_growth_bonus(base_gdp, inputs.previous_gdp);
    let growth_rate = bonus::growth_rate(base_gdp, inputs.previous_gdp);
    let streak_bonus = bonus::calculate_streak_bonus(inputs.streak_days);

    let active_sectors = inputs
        .sectors
        .iter()
        .filter(|sector| sector.is_unlocked)
        .count() as u32;
    let diversity_bonus =
        bonus::calculate_diversity_bonus(active_sectors, inputs.total_available_sectors);

    let total_gdp = base_gdp + growth_bonus + streak_bonus + diversity_bonus;
    tracing::debug!(
        total_gdp,
        base_gdp,
        growth_bonus,
        streak_bonus,
        diversity_bonus,
        growth_rate,
        "national gdp computed"
    );

    GdpBreakdown {
        total_gdp,
        base_gdp,
        growth_bonus,
        streak_bonus,
        diversity_bonus,
        growth_rate,
    }
}

/// Rounds `numerator / denominator` to the nearest integer, ties toward +inf.
///
/// `denominator` must be positive.
pub(crate) fn round_half_up(numerator: i128, denominator: i128) -> i64 {
    debug_assert!(denominator > 0, "denominator must be positive");
    (2 * numerator + denominator).div_euclid(2 * denominator) as i64
}
