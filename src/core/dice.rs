//! Dice expressions as they appear in reference data: `2d6`, `1d8+3`, `1d4 + MOD`, `7`.

use serde::{Deserialize, Serialize};

/// Placeholder for the caster's spellcasting modifier in healing expressions.
pub const MODIFIER_TOKEN: &str = "MOD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpr {
    pub count: i32,
    pub sides: i32,
    pub bonus: i32,
    /// Expression ends in `+ MOD`.
    pub adds_modifier: bool,
}

impl DiceExpr {
    pub fn flat(value: i32) -> Self {
        Self {
            count: 0,
            sides: 0,
            bonus: value,
            adds_modifier: false,
        }
    }

    /// Parses an expression, returning None for anything unrecognized.
    pub fn parse(expr: &str) -> Option<Self> {
        let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }

        let (compact, adds_modifier) = match compact.strip_suffix(MODIFIER_TOKEN) {
            Some(rest) => (rest.trim_end_matches('+').to_string(), true),
            None => (compact, false),
        };

        let Some(d_pos) = compact.find('d') else {
            let bonus = compact.parse().ok()?;
            return Some(Self {
                adds_modifier,
                ..Self::flat(bonus)
            });
        };

        let count = match &compact[..d_pos] {
            "" => 1,
            n => n.parse().ok()?,
        };
        let rest = &compact[d_pos + 1..];
        let (sides_str, bonus) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(sign_pos) => {
                let bonus: i32 = rest[sign_pos + 1..].parse().ok()?;
                let bonus = if rest.as_bytes()[sign_pos] == b'-' {
                    -bonus
                } else {
                    bonus
                };
                (&rest[..sign_pos], bonus)
            }
            None => (rest, 0),
        };
        let sides = sides_str.parse().ok()?;

        Some(Self {
            count,
            sides,
            bonus,
            adds_modifier,
        })
    }

    /// Integer average: `n * (s + 1) / 2 + bonus`.
    pub fn average(&self) -> i32 {
        self.count * (self.sides + 1) / 2 + self.bonus
    }

    pub fn average_with_modifier(&self, modifier: i32) -> i32 {
        if self.adds_modifier {
            self.average() + modifier
        } else {
            self.average()
        }
    }
}

/// Average of a dice expression, treating unparseable input as zero.
pub fn average_of(expr: &str) -> i32 {
    DiceExpr::parse(expr).map(|d| d.average()).unwrap_or(0)
}
