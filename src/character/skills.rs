use super::attributes::{AttributeType, Attributes};
use crate::core::constants::NUM_SKILLS;
use serde::{Deserialize, Serialize};

/// The eighteen standard skills: (index, display name, governing ability).
pub const SKILL_TABLE: [(&str, &str, AttributeType); NUM_SKILLS] = [
    ("skill-acrobatics", "Acrobatics", AttributeType::Dexterity),
    ("skill-animal-handling", "Animal Handling", AttributeType::Wisdom),
    ("skill-arcana", "Arcana", AttributeType::Intelligence),
    ("skill-athletics", "Athletics", AttributeType::Strength),
    ("skill-deception", "Deception", AttributeType::Charisma),
    ("skill-history", "History", AttributeType::Intelligence),
    ("skill-insight", "Insight", AttributeType::Wisdom),
    ("skill-intimidation", "Intimidation", AttributeType::Charisma),
    ("skill-investigation", "Investigation", AttributeType::Intelligence),
    ("skill-medicine", "Medicine", AttributeType::Wisdom),
    ("skill-nature", "Nature", AttributeType::Intelligence),
    ("skill-perception", "Perception", AttributeType::Wisdom),
    ("skill-performance", "Performance", AttributeType::Charisma),
    ("skill-persuasion", "Persuasion", AttributeType::Charisma),
    ("skill-religion", "Religion", AttributeType::Intelligence),
    ("skill-sleight-of-hand", "Sleight of Hand", AttributeType::Dexterity),
    ("skill-stealth", "Stealth", AttributeType::Dexterity),
    ("skill-survival", "Survival", AttributeType::Wisdom),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub index: String,
    pub name: String,
    pub ability: AttributeType,
    pub modifier: i32,
    pub proficient: bool,
    pub expertise: bool,
}

impl Skill {
    pub fn is_skill_index(index: &str) -> bool {
        SKILL_TABLE.iter().any(|(i, _, _)| *i == index)
    }
}

/// Builds the full skill list. Expertise doubles the proficiency contribution.
pub fn standard_skills(
    attrs: &Attributes,
    proficiency_bonus: i32,
    proficiencies: &[String],
    expertise: &[String],
) -> Vec<Skill> {
    SKILL_TABLE
        .iter()
        .map(|(index, name, ability)| {
            let proficient = proficiencies.iter().any(|p| p == index);
            let expert = expertise.iter().any(|e| e == index);
            let mut modifier = attrs.modifier(*ability);
            if proficient || expert {
                modifier += proficiency_bonus;
            }
            if expert {
                modifier += proficiency_bonus;
            }
            Skill {
                index: index.to_string(),
                name: name.to_string(),
                ability: *ability,
                modifier,
                proficient: proficient || expert,
                expertise: expert,
            }
        })
        .collect()
}

/// Monster skills: listed values override the ability-derived modifier.
pub fn monster_skills(attrs: &Attributes, listed: &[(String, i32)]) -> Vec<Skill> {
    SKILL_TABLE
        .iter()
        .map(|(index, name, ability)| {
            let listed_value = listed.iter().find(|(i, _)| i == index).map(|(_, v)| *v);
            Skill {
                index: index.to_string(),
                name: name.to_string(),
                ability: *ability,
                modifier: listed_value.unwrap_or_else(|| attrs.modifier(*ability)),
                proficient: listed_value.is_some(),
                expertise: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_eighteen_skills() {
        let attrs = Attributes::from_values([10; 6]);
        assert_eq!(standard_skills(&attrs, 2, &[], &[]).len(), 18);
    }

    #[test]
    fn test_proficiency_and_expertise() {
        let attrs = Attributes::from_values([10, 16, 10, 10, 10, 10]);
        let skills = standard_skills(
            &attrs,
            3,
            &["skill-stealth".into(), "skill-acrobatics".into()],
            &["skill-stealth".into()],
        );
        let stealth = skills.iter().find(|s| s.index == "skill-stealth").unwrap();
        let acrobatics = skills
            .iter()
            .find(|s| s.index == "skill-acrobatics")
            .unwrap();
        let sleight = skills
            .iter()
            .find(|s| s.index == "skill-sleight-of-hand")
            .unwrap();
        assert_eq!(stealth.modifier, 3 + 6);
        assert!(stealth.expertise);
        assert_eq!(acrobatics.modifier, 3 + 3);
        assert_eq!(sleight.modifier, 3);
        assert!(!sleight.proficient);
    }

    #[test]
    fn test_monster_listed_values_override() {
        let attrs = Attributes::from_values([10, 14, 10, 10, 12, 10]);
        let skills = monster_skills(&attrs, &[("skill-perception".into(), 5)]);
        let perception = skills
            .iter()
            .find(|s| s.index == "skill-perception")
            .unwrap();
        assert_eq!(perception.modifier, 5);
        assert!(perception.proficient);
        assert_eq!(skills.iter().filter(|s| s.proficient).count(), 1);
    }

    #[test]
    fn test_is_skill_index() {
        assert!(Skill::is_skill_index("skill-arcana"));
        assert!(!Skill::is_skill_index("longswords"));
    }
}
