// 🎯 Points Calculator - tiered reward formula
//
// Tier 1: every unit above 100 earns 2 points
// Tier 2: every unit between 50 and 100 earns 1 point
// Amounts of 50 or less earn nothing

/// Upper bound of the 1-point tier, start of the 2-point tier
pub const DOUBLE_POINTS_THRESHOLD: f64 = 100.0;

/// Start of the 1-point tier
pub const SINGLE_POINTS_THRESHOLD: f64 = 50.0;

/// Reward points earned by a single purchase amount
///
/// Both tier contributions are summed in floating point and truncated once.
/// Callers validate `amount > 0` before getting here.
pub fn points(amount: f64) -> u64 {
    let double_tier = (amount - DOUBLE_POINTS_THRESHOLD).max(0.0) * 2.0;
    let single_tier = (amount.min(DOUBLE_POINTS_THRESHOLD) - SINGLE_POINTS_THRESHOLD).max(0.0);

    (double_tier + single_tier) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tier_only() {
        assert_eq!(points(60.0), 10);
        assert_eq!(points(100.0), 50);
    }

    #[test]
    fn test_both_tiers() {
        assert_eq!(points(120.0), 90);
        assert_eq!(points(200.0), 250);
    }

    #[test]
    fn test_below_threshold_earns_nothing() {
        assert_eq!(points(30.0), 0);
        assert_eq!(points(50.0), 0);
        assert_eq!(points(0.01), 0);
    }

    #[test]
    fn test_fractional_amounts_truncate_once() {
        // 2 * 0.75 + 50 = 51.5
        assert_eq!(points(100.75), 51);
        // 2 * 20.5 + 50 = 91
        assert_eq!(points(120.5), 91);
        assert_eq!(points(50.99), 0);
        assert_eq!(points(75.5), 25);
    }
}
