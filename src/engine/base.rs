use super::round_half_up;
use crate::types::scoring::Gdp;
use crate::types::sector::SectorScore;

/// Multiplier turning a 0-100 weighted mean into the 0-1000 base index.
pub const BASE_SCALE: i128 = 10;

/// Weighted mean of unlocked sector scores, scaled x10 and rounded half-up.
///
/// Weights are compared as stored (x100); the scale cancels in the ratio. No
/// unlocked sector, or a zero total weight, yields 0.
pub fn calculate_base_gdp(sectors: &[SectorScore]) -> Gdp {
    let (weighted_sum, total_weight) = sectors
        .iter()
        .filter(|sector| sector.is_unlocked)
        .fold((0i128, 0i128), |(sum, weight), sector| {
            let sector_weight = i128::from(sector.weight);
            (
                sum + i128::from(sector.score) * sector_weight,
                weight + sector_weight,
            )
        });

    if total_weight == 0 {
        return 0;
    }
    round_half_up(weighted_sum * BASE_SCALE, total_weight)
}
