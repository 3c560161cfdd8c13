use super::round_half_up;
use crate::types::scoring::Gdp;

pub const GROWTH_MULTIPLIER: i128 = 2;
pub const STREAK_POINTS_PER_DAY: u32 = 2;
pub const STREAK_BONUS_CAP: u32 = 100;
pub const DIVERSITY_BONUS_MAX: i128 = 50;

/// Twice the percentage growth of `current` over `previous`, never negative.
///
/// A non-positive `previous` means there is no history to grow from.
pub fn calculate_growth_bonus(current: Gdp, previous: Gdp) -> Gdp {
    if previous <= 0 {
        return 0;
    }
    let delta = i128::from(current) - i128::from(previous);
    round_half_up(delta * 100 * GROWTH_MULTIPLIER, i128::from(previous)).max(0)
}

/// Percentage change of `current` over `previous`, rounded half-up to one decimal.
pub fn growth_rate(current: Gdp, previous: Gdp) -> f64 {
    if previous <= 0 {
        return 0.0;
    }
    let delta = i128::from(current) - i128::from(previous);
    let tenths = round_half_up(delta * 1000, i128::from(previous));
    tenths as f64 / 10.0
}

pub fn calculate_streak_bonus(streak_days: u32) -> Gdp {
    Gdp::from(
        streak_days
            .saturating_mul(STREAK_POINTS_PER_DAY)
            .min(STREAK_BONUS_CAP),
    )
}

/// Share of available sectors the user has unlocked, scaled to at most 50.
pub fn calculate_diversity_bonus(active_sectors: u32, total_available_sectors: u32) -> Gdp {
    if total_available_sectors == 0 {
        return 0;
    }
    round_half_up(
        i128::from(active_sectors) * DIVERSITY_BONUS_MAX,
        i128::from(total_available_sectors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_bonus_is_zero_without_history() {
        for current in [0, 1, 500, 1000, 5000] {
            assert_eq!(calculate_growth_bonus(current, 0), 0);
            assert_eq!(growth_rate(current, 0), 0.0);
        }
    }

    #[test]
    fn growth_bonus_doubles_percentage_growth() {
        assert_eq!(calculate_growth_bonus(798, 600), 66);
        assert_eq!(calculate_growth_bonus(660, 600), 20);
        assert_eq!(calculate_growth_bonus(600, 600), 0);
    }

    #[test]
    fn growth_bonus_never_penalises_decline() {
        assert_eq!(calculate_growth_bonus(300, 600), 0);
        assert_eq!(calculate_growth_bonus(0, 1), 0);
    }

    #[test]
    fn growth_bonus_is_monotonic_in_delta() {
        for previous in [1, 7, 333, 600, 999] {
            let mut last = 0;
            for current in 0..=1200 {
                let bonus = calculate_growth_bonus(current, previous);
                assert!(bonus >= 0);
                assert!(bonus >= last, "bonus dropped at {current}/{previous}");
                last = bonus;
            }
        }
    }

    #[test]
    fn growth_rate_keeps_one_decimal() {
        assert_eq!(growth_rate(798, 600), 33.0);
        assert_eq!(growth_rate(700, 600), 16.7);
        assert_eq!(growth_rate(500, 600), -16.7);
        assert_eq!(growth_rate(601, 600), 0.2);
    }

    #[test]
    fn streak_bonus_is_linear_then_capped() {
        assert_eq!(calculate_streak_bonus(0), 0);
        assert_eq!(calculate_streak_bonus(10), 20);
        assert_eq!(calculate_streak_bonus(50), 100);
        assert_eq!(calculate_streak_bonus(200), 100);
        assert_eq!(calculate_streak_bonus(u32::MAX), 100);
    }

    #[test]
    fn diversity_bonus_handles_empty_availability() {
        assert_eq!(calculate_diversity_bonus(0, 0), 0);
        assert_eq!(calculate_diversity_bonus(3, 0), 0);
    }

    #[test]
    fn diversity_bonus_saturates_when_everything_is_unlocked() {
        for available in 1..=9 {
            assert_eq!(calculate_diversity_bonus(available, available), 50);
        }
        assert_eq!(calculate_diversity_bonus(1, 3), 17);
        assert_eq!(calculate_diversity_bonus(1, 4), 13);
        assert_eq!(calculate_diversity_bonus(0, 6), 0);
    }
}
