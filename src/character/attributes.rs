use crate::core::constants::{
    ASI_POINTS, BASE_ATTRIBUTE_VALUE, NUM_ATTRIBUTES, PRIMAL_CHAMPION_BONUS, STANDARD_ARRAY,
};
use crate::reference::AbilityBonus;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_ATTRIBUTES] {
        [
            AttributeType::Strength,
            AttributeType::Dexterity,
            AttributeType::Constitution,
            AttributeType::Intelligence,
            AttributeType::Wisdom,
            AttributeType::Charisma,
        ]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            AttributeType::Strength => "STR",
            AttributeType::Dexterity => "DEX",
            AttributeType::Constitution => "CON",
            AttributeType::Intelligence => "INT",
            AttributeType::Wisdom => "WIS",
            AttributeType::Charisma => "CHA",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AttributeType::Strength => 0,
            AttributeType::Dexterity => 1,
            AttributeType::Constitution => 2,
            AttributeType::Intelligence => 3,
            AttributeType::Wisdom => 4,
            AttributeType::Charisma => 5,
        }
    }

    /// Parses the lowercase codes used by reference data (`str`, `dex`, ...).
    pub fn from_code(code: &str) -> Option<AttributeType> {
        match code.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Some(AttributeType::Strength),
            "dex" | "dexterity" => Some(AttributeType::Dexterity),
            "con" | "constitution" => Some(AttributeType::Constitution),
            "int" | "intelligence" => Some(AttributeType::Intelligence),
            "wis" | "wisdom" => Some(AttributeType::Wisdom),
            "cha" | "charisma" => Some(AttributeType::Charisma),
            _ => None,
        }
    }
}

/// One ability score. The modifier is always derived from the value.
///
/// `save_bonus` is whatever sits on top of the modifier for saving throws
/// (proficiency, feature bonuses, or a monster's listed save).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AbilityScoreRepr", from = "AbilityScoreRepr")]
pub struct AbilityScore {
    value: i32,
    save_bonus: i32,
}

#[derive(Serialize, Deserialize)]
struct AbilityScoreRepr {
    value: i32,
    modifier: i32,
    save: i32,
}

impl From<AbilityScore> for AbilityScoreRepr {
    fn from(score: AbilityScore) -> Self {
        Self {
            value: score.value,
            modifier: score.modifier(),
            save: score.save(),
        }
    }
}

impl From<AbilityScoreRepr> for AbilityScore {
    fn from(repr: AbilityScoreRepr) -> Self {
        let mut score = AbilityScore::new(repr.value);
        score.save_bonus = repr.save - score.modifier();
        score
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(BASE_ATTRIBUTE_VALUE)
    }
}

impl AbilityScore {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            save_bonus: 0,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// `floor((value - 10) / 2)`.
    pub fn modifier(&self) -> i32 {
        (self.value - BASE_ATTRIBUTE_VALUE).div_euclid(2)
    }

    pub fn save(&self) -> i32 {
        self.modifier() + self.save_bonus
    }

    pub fn save_bonus(&self) -> i32 {
        self.save_bonus
    }

    pub fn add_value(&mut self, amount: i32) {
        self.value += amount;
    }

    pub fn add_save_bonus(&mut self, amount: i32) {
        self.save_bonus += amount;
    }

    /// Overrides the total save, keeping it consistent with later value changes.
    pub fn set_save(&mut self, save: i32) {
        self.save_bonus = save - self.modifier();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    scores: [AbilityScore; NUM_ATTRIBUTES],
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: [i32; NUM_ATTRIBUTES]) -> Self {
        Self {
            scores: values.map(AbilityScore::new),
        }
    }

    pub fn get(&self, attr: AttributeType) -> &AbilityScore {
        &self.scores[attr.index()]
    }

    pub fn get_mut(&mut self, attr: AttributeType) -> &mut AbilityScore {
        &mut self.scores[attr.index()]
    }

    pub fn value(&self, attr: AttributeType) -> i32 {
        self.get(attr).value()
    }

    pub fn modifier(&self, attr: AttributeType) -> i32 {
        self.get(attr).modifier()
    }

    pub fn save(&self, attr: AttributeType) -> i32 {
        self.get(attr).save()
    }

    pub fn increment(&mut self, attr: AttributeType) {
        self.get_mut(attr).add_value(1);
    }

    pub fn total(&self) -> i32 {
        self.scores.iter().map(|s| s.value()).sum()
    }
}

/// Shuffles the standard array onto the six abilities.
pub fn assign_standard_array(rng: &mut impl Rng) -> Attributes {
    let mut values = STANDARD_ARRAY;
    values.shuffle(rng);
    Attributes::from_values(values)
}

/// Applies racial bonuses. Unknown ability codes are ignored.
pub fn apply_ability_bonuses(attrs: &mut Attributes, bonuses: &[AbilityBonus]) {
    for bonus in bonuses {
        if let Some(attr) = AttributeType::from_code(&bonus.ability) {
            attrs.get_mut(attr).add_value(bonus.bonus);
        }
    }
}

/// Spends `improvements` ability-score improvements, one random ability per point.
///
/// No cap is enforced.
pub fn apply_score_improvements(attrs: &mut Attributes, improvements: u32, rng: &mut impl Rng) {
    let all = AttributeType::all();
    for _ in 0..improvements * ASI_POINTS {
        let attr = all[rng.gen_range(0..NUM_ATTRIBUTES)];
        attrs.increment(attr);
    }
}

pub fn apply_primal_champion(attrs: &mut Attributes) {
    attrs
        .get_mut(AttributeType::Strength)
        .add_value(PRIMAL_CHAMPION_BONUS);
    attrs
        .get_mut(AttributeType::Constitution)
        .add_value(PRIMAL_CHAMPION_BONUS);
}

/// Marks saving-throw proficiencies given as ability codes.
pub fn apply_save_proficiencies(attrs: &mut Attributes, codes: &[String], proficiency_bonus: i32) {
    for code in codes {
        if let Some(attr) = AttributeType::from_code(code) {
            attrs.get_mut(attr).add_save_bonus(proficiency_bonus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::STANDARD_ARRAY_TOTAL;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_modifier_calculation() {
        assert_eq!(AbilityScore::new(10).modifier(), 0);
        assert_eq!(AbilityScore::new(11).modifier(), 0);
        assert_eq!(AbilityScore::new(12).modifier(), 1);
        assert_eq!(AbilityScore::new(15).modifier(), 2);
        assert_eq!(AbilityScore::new(20).modifier(), 5);
        assert_eq!(AbilityScore::new(30).modifier(), 10);
    }

    #[test]
    fn test_modifier_floors_below_ten() {
        assert_eq!(AbilityScore::new(9).modifier(), -1);
        assert_eq!(AbilityScore::new(8).modifier(), -1);
        assert_eq!(AbilityScore::new(7).modifier(), -2);
        assert_eq!(AbilityScore::new(1).modifier(), -5);
    }

    #[test]
    fn test_save_follows_value_changes() {
        let mut score = AbilityScore::new(13);
        score.add_save_bonus(2);
        assert_eq!(score.save(), 3);

        // Odd -> even steps both modifier and save
        score.add_value(1);
        assert_eq!(score.modifier(), 2);
        assert_eq!(score.save(), 4);

        // Even -> odd leaves them alone
        score.add_value(1);
        assert_eq!(score.modifier(), 2);
        assert_eq!(score.save(), 4);
    }

    #[test]
    fn test_set_save_overrides_total() {
        let mut score = AbilityScore::new(14);
        score.set_save(6);
        assert_eq!(score.save(), 6);
        assert_eq!(score.save_bonus(), 4);
    }

    #[test]
    fn test_standard_array_sums_to_72() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let attrs = assign_standard_array(&mut rng);
            assert_eq!(attrs.total(), STANDARD_ARRAY_TOTAL);
        }
    }

    #[test]
    fn test_standard_array_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let attrs = assign_standard_array(&mut rng);
        let mut values: Vec<i32> = AttributeType::all()
            .iter()
            .map(|a| attrs.value(*a))
            .collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(values, STANDARD_ARRAY.to_vec());
    }

    #[test]
    fn test_racial_bonuses_skip_unknown_codes() {
        let mut attrs = Attributes::from_values([10; 6]);
        apply_ability_bonuses(
            &mut attrs,
            &[
                AbilityBonus {
                    ability: "con".into(),
                    bonus: 2,
                },
                AbilityBonus {
                    ability: "luck".into(),
                    bonus: 5,
                },
            ],
        );
        assert_eq!(attrs.value(AttributeType::Constitution), 12);
        assert_eq!(attrs.total(), 62);
    }

    #[test]
    fn test_score_improvements_spend_two_points_each() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut attrs = Attributes::from_values([10; 6]);
        apply_score_improvements(&mut attrs, 3, &mut rng);
        assert_eq!(attrs.total(), 66);
    }

    #[test]
    fn test_primal_champion() {
        let mut attrs = Attributes::from_values([16, 10, 14, 10, 10, 10]);
        apply_primal_champion(&mut attrs);
        assert_eq!(attrs.value(AttributeType::Strength), 20);
        assert_eq!(attrs.value(AttributeType::Constitution), 18);
    }

    #[test]
    fn test_save_proficiencies() {
        let mut attrs = Attributes::from_values([16, 12, 14, 10, 10, 8]);
        apply_save_proficiencies(&mut attrs, &["str".into(), "con".into()], 2);
        assert_eq!(attrs.save(AttributeType::Strength), 5);
        assert_eq!(attrs.save(AttributeType::Constitution), 4);
        assert_eq!(attrs.save(AttributeType::Dexterity), 1);
    }

    #[test]
    fn test_from_code_round_trip() {
        for attr in AttributeType::all() {
            let code = attr.abbrev().to_ascii_lowercase();
            assert_eq!(AttributeType::from_code(&code), Some(attr));
        }
        assert_eq!(AttributeType::from_code("luck"), None);
    }

    #[test]
    fn test_index_returns_unique_values() {
        for (i, attr) in AttributeType::all().iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn test_serialized_score_carries_modifier_and_save() {
        let mut score = AbilityScore::new(17);
        score.add_save_bonus(3);
        let json = serde_json::to_value(score).unwrap();
        assert_eq!(json["value"], 17);
        assert_eq!(json["modifier"], 3);
        assert_eq!(json["save"], 6);
        let back: AbilityScore = serde_json::from_value(json).unwrap();
        assert_eq!(back, score);
    }
}
