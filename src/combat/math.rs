//! Probability helpers shared by party and monster power estimates.
//!
//! Pure functions over d20 rolls, recharge dice and limited-use actions.

use crate::core::constants::D20_FACES;
use crate::core::dice::DiceExpr;
use crate::reference::ActionUsage;

/// Chance that a d20 roll plus `bonus` reaches `target`.
///
/// A natural 1 always misses and a natural 20 always hits.
///
/// # Arguments
/// * `target` - AC or DC to reach
/// * `bonus` - Attack or save bonus added to the roll
///
/// # Returns
/// Probability in [1/20, 19/20] unless the target is trivially low
pub fn hit_probability(target: i32, bonus: i32) -> f64 {
    let hits = (1..=D20_FACES)
        .filter(|&face| face == D20_FACES || (face != 1 && face + bonus >= target))
        .count();
    hits as f64 / D20_FACES as f64
}

/// Chance that a `dN` recharge roll lands on `min` or higher.
pub fn recharge_probability(sides: i32, min: i32) -> f64 {
    if sides <= 0 {
        return 0.0;
    }
    // P(dN >= min) = (N - min + 1) / N
    (sides - min + 1).clamp(0, sides) as f64 / sides as f64
}

/// Share of rounds in which a limited action is available.
///
/// Recharge actions use the recharge chance. Per-day and after-rest actions spread
/// their uses over the expected fight length, capped at every round.
pub fn usage_fraction(usage: Option<&ActionUsage>, expected_rounds: u32) -> f64 {
    let Some(usage) = usage else {
        return 1.0;
    };
    match usage.kind.as_str() {
        "recharge on roll" => {
            let sides = usage
                .dice
                .as_deref()
                .and_then(DiceExpr::parse)
                .map(|d| d.sides)
                .unwrap_or(6);
            recharge_probability(sides, usage.min_value.unwrap_or(sides))
        }
        "per day" | "recharge after rest" => {
            per_rounds(usage.times.unwrap_or(1), expected_rounds)
        }
        _ => 1.0,
    }
}

/// `uses / rounds`, capped at 1.
pub fn per_rounds(uses: u32, expected_rounds: u32) -> f64 {
    (uses as f64 / expected_rounds.max(1) as f64).min(1.0)
}

/// Damage multiplier of one damage type against a defense profile.
///
/// Applied in order: resistance halves, immunity zeroes, vulnerability doubles.
pub fn damage_factor(
    resistances: &[String],
    immunities: &[String],
    vulnerabilities: &[String],
    damage_type: &str,
) -> f64 {
    let listed = |tags: &[String]| tags.iter().any(|t| t == damage_type);
    let mut factor = 1.0;
    if listed(resistances) {
        factor *= 0.5;
    }
    if listed(immunities) {
        factor = 0.0;
    }
    if listed(vulnerabilities) {
        factor *= 2.0;
    }
    factor
}

/// Arithmetic mean, 0 for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(kind: &str, times: Option<u32>, dice: Option<&str>, min: Option<i32>) -> ActionUsage {
        ActionUsage {
            kind: kind.to_string(),
            times,
            dice: dice.map(String::from),
            min_value: min,
        }
    }

    #[test]
    fn test_hit_probability_examples() {
        // AC 16 with +7: faces 9..=20 hit
        assert_eq!(hit_probability(16, 7), 12.0 / 20.0);
        // Impossible target still hits on a 20
        assert_eq!(hit_probability(40, 0), 1.0 / 20.0);
        // Trivial target still misses on a 1
        assert_eq!(hit_probability(2, 5), 19.0 / 20.0);
    }

    #[test]
    fn test_recharge_probability() {
        assert_eq!(recharge_probability(6, 5), 2.0 / 6.0);
        assert_eq!(recharge_probability(6, 6), 1.0 / 6.0);
        assert_eq!(recharge_probability(6, 1), 1.0);
        assert_eq!(recharge_probability(0, 1), 0.0);
    }

    #[test]
    fn test_usage_fraction() {
        assert_eq!(usage_fraction(None, 5), 1.0);
        let recharge = usage("recharge on roll", None, Some("1d6"), Some(5));
        assert_eq!(usage_fraction(Some(&recharge), 5), 2.0 / 6.0);
        let per_day = usage("per day", Some(3), None, None);
        assert_eq!(usage_fraction(Some(&per_day), 6), 0.5);
        assert_eq!(usage_fraction(Some(&per_day), 1), 1.0);
        let rest = usage("recharge after rest", None, None, None);
        assert_eq!(usage_fraction(Some(&rest), 10), 0.1);
    }

    #[test]
    fn test_damage_factors_compose() {
        let fire = vec!["fire".to_string()];
        let none: Vec<String> = Vec::new();
        assert_eq!(damage_factor(&fire, &none, &none, "fire"), 0.5);
        assert_eq!(damage_factor(&none, &none, &fire, "fire"), 2.0);
        assert_eq!(damage_factor(&fire, &fire, &none, "fire"), 0.0);
        assert_eq!(damage_factor(&fire, &none, &none, "cold"), 1.0);
        // Resistance and vulnerability cancel; immunity survives doubling
        assert_eq!(damage_factor(&fire, &none, &fire, "fire"), 1.0);
        assert_eq!(damage_factor(&none, &fire, &fire, "fire"), 0.0);
        assert_eq!(damage_factor(&fire, &fire, &fire, "fire"), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::new()), 0.0);
        assert_eq!(mean([1.0, 2.0, 3.0]), 2.0);
    }
}
