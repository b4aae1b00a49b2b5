//! Label lookup and upgrade pricing.

use crate::character::Character;
use crate::error::Error;
use crate::universe::entity::{Aptitude, Background, Characteristic, Gauge, Skill, Talent};
use crate::universe::Universe;

/// The universe entity an upgrade label resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coster {
    Characteristic(Characteristic),
    Skill(Skill),
    Talent(Talent),
    Aptitude(Aptitude),
    Gauge(Gauge),
}

impl Coster {
    /// Type key of the cost matrix.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Characteristic(_) => "characteristic",
            Self::Skill(_) => "skill",
            Self::Talent(_) => "talent",
            Self::Aptitude(_) => "aptitude",
            Self::Gauge(_) => "gauge",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Characteristic(c) => &c.name,
            Self::Skill(s) => &s.name,
            Self::Talent(t) => &t.name,
            Self::Aptitude(a) => a.as_str(),
            Self::Gauge(g) => &g.name,
        }
    }

    pub fn aptitudes(&self) -> &[Aptitude] {
        match self {
            Self::Characteristic(c) => &c.aptitudes,
            Self::Skill(s) => &s.aptitudes,
            Self::Talent(t) => &t.aptitudes,
            Self::Aptitude(_) => &[],
            Self::Gauge(g) => &g.aptitudes,
        }
    }

    /// Tier the next purchase of this entity is priced on.
    fn tier(&self, character: &Character) -> u32 {
        match self {
            Self::Characteristic(c) => character.advances(&c.name).saturating_add(1),
            Self::Skill(s) => character.skill_rank(&s.full_name()).saturating_add(1),
            Self::Talent(t) => t.tier,
            Self::Aptitude(_) | Self::Gauge(_) => 1,
        }
    }

    /// Price of buying this entity now, given what the character already holds.
    pub fn cost(&self, universe: &Universe, character: &Character) -> Result<i64, Error> {
        let matches = character.count_matching_aptitudes(self.aptitudes());
        let tier = self.tier(character);
        universe.costs.price(self.kind(), matches, tier)
    }
}

impl Universe {
    /// Resolve an upgrade label. Characteristics win over skills, skills over
    /// talents, then aptitudes and gauges.
    pub fn find_coster(&self, label: &str) -> Option<Coster> {
        self.find_characteristic(label)
            .map(Coster::Characteristic)
            .or_else(|| self.find_skill(label).map(Coster::Skill))
            .or_else(|| self.find_talent(label).map(Coster::Talent))
            .or_else(|| self.find_aptitude(label).map(Coster::Aptitude))
            .or_else(|| self.find_gauge(label).map(Coster::Gauge))
    }

    /// Characteristic labels carry a value after a space: `STR +5`, `TOU 40`.
    pub fn find_characteristic(&self, label: &str) -> Option<Characteristic> {
        let name = first_word(label);
        self.characteristics.iter().find(|c| c.name == name).cloned()
    }

    /// Skill labels may carry a speciality after a colon: `Common Lore: Dark Gods`.
    pub fn find_skill(&self, label: &str) -> Option<Skill> {
        let (name, speciality) = split_speciality(label);
        let mut skill = self.skills.iter().find(|s| s.name == name).cloned()?;
        skill.speciality = speciality;
        Some(skill)
    }

    pub fn find_talent(&self, label: &str) -> Option<Talent> {
        let (name, speciality) = split_speciality(label);
        let mut talent = self.talents.iter().find(|t| t.name == name).cloned()?;
        talent.speciality = speciality;
        Some(talent)
    }

    pub fn find_aptitude(&self, label: &str) -> Option<Aptitude> {
        self.aptitudes.iter().find(|a| a.as_str() == label).cloned()
    }

    /// Gauge labels carry a value after a space, like characteristics.
    pub fn find_gauge(&self, label: &str) -> Option<Gauge> {
        let name = first_word(label);
        self.gauges.iter().find(|g| g.name == name).cloned()
    }

    pub fn find_background(&self, kind: &str, name: &str) -> Option<&Background> {
        self.backgrounds.get(kind)?.iter().find(|b| b.name == name)
    }
}

fn first_word(label: &str) -> &str {
    label.split(' ').next().unwrap_or(label).trim()
}

fn split_speciality(label: &str) -> (&str, Option<String>) {
    match label.split_once(':') {
        Some((name, speciality)) => {
            let speciality = speciality.trim();
            let speciality = (!speciality.is_empty()).then(|| speciality.to_string());
            (name.trim(), speciality)
        }
        None => (label.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::CostMatrix;

    fn universe() -> Universe {
        Universe {
            aptitudes: vec!["Fieldcraft".into(), "Willpower".into(), "Jaded".into()],
            characteristics: vec![Characteristic {
                name: "STR".to_string(),
                description: String::new(),
                aptitudes: vec!["Strength".into(), "Offence".into()],
            }],
            gauges: vec![Gauge {
                name: "Fate".to_string(),
                description: String::new(),
                aptitudes: Vec::new(),
            }],
            skills: vec![Skill {
                name: "Common Lore".to_string(),
                description: String::new(),
                aptitudes: vec!["Intelligence".into(), "General".into()],
                speciality: None,
            }],
            talents: vec![Talent {
                name: "Jaded".to_string(),
                description: String::new(),
                aptitudes: vec!["Willpower".into(), "Defence".into()],
                tier: 1,
                requirements: vec!["WP 30".to_string()],
                stackable: false,
                speciality: None,
            }],
            costs: CostMatrix::new()
                .with("characteristic", 1, 1, 250)
                .with("characteristic", 1, 2, 500)
                .with("skill", 0, 1, 200)
                .with("talent", 1, 1, 300),
            ..Universe::default()
        }
    }

    #[test]
    fn characteristic_labels_resolve_on_their_first_word() {
        let coster = universe().find_coster("STR +5").unwrap();
        assert_eq!(coster.kind(), "characteristic");
        assert_eq!(coster.name(), "STR");
        assert!(universe().find_coster("STRENGTH +5").is_none());
    }

    #[test]
    fn skill_labels_keep_their_speciality() {
        let Some(Coster::Skill(skill)) = universe().find_coster("Common Lore: Dark Gods") else {
            panic!("expected a skill");
        };
        assert_eq!(skill.speciality.as_deref(), Some("Dark Gods"));
        assert_eq!(skill.full_name(), "Common Lore: Dark Gods");
    }

    #[test]
    fn talents_win_over_aptitudes_of_the_same_name() {
        let coster = universe().find_coster("Jaded").unwrap();
        assert_eq!(coster.kind(), "talent");
        assert_eq!(universe().find_coster("Fieldcraft").unwrap().kind(), "aptitude");
    }

    #[test]
    fn gauges_and_unknown_labels() {
        assert_eq!(universe().find_coster("Fate +1").unwrap().kind(), "gauge");
        assert!(universe().find_coster("Peanuts").is_none());
    }

    #[test]
    fn characteristic_tier_follows_bought_advances() {
        let universe = universe();
        let coster = universe.find_coster("STR +5").unwrap();
        let mut character = Character::default();
        character.aptitudes.insert("Offence".into());
        assert_eq!(coster.cost(&universe, &character), Ok(250));

        character.advances.insert("STR".to_string(), 1);
        assert_eq!(coster.cost(&universe, &character), Ok(500));

        character.advances.insert("STR".to_string(), 2);
        assert_eq!(
            coster.cost(&universe, &character),
            Err(Error::UndefinedTierCost {
                kind: "characteristic".to_string(),
                matches: 1,
                tier: 3
            })
        );
    }

    #[test]
    fn talent_is_priced_on_its_declared_tier() {
        let universe = universe();
        let coster = universe.find_coster("Jaded").unwrap();
        let mut character = Character::default();
        assert_eq!(
            coster.cost(&universe, &character),
            Err(Error::UndefinedMatchCost {
                kind: "talent".to_string(),
                matches: 0
            })
        );
        character.aptitudes.insert("Willpower".into());
        assert_eq!(coster.cost(&universe, &character), Ok(300));
    }
}
