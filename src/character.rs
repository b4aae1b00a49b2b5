//! Replaying a sheet's sessions against a universe.
//!
//! Upgrades are applied in sheet order. A granted upgrade is priced before its
//! effect lands, so a characteristic advance is priced on the tier it is about
//! to reach and a skill rank on the rank it is about to gain.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Error;
use crate::sheet::{Header, Sheet, Upgrade};
use crate::universe::{Aptitude, Coster, Universe};

/// Experience earned from session rewards and spent on upgrades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub earned: i64,
    pub spent: i64,
}

impl Experience {
    /// `None` when the balance does not fit an `i64`.
    pub fn remaining(&self) -> Option<i64> {
        self.earned.checked_sub(self.spent)
    }
}

/// A character's state after some or all of its sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Character {
    pub header: Header,
    pub characteristics: BTreeMap<String, i64>,
    pub gauges: BTreeMap<String, i64>,
    pub aptitudes: BTreeSet<Aptitude>,
    /// Full skill name (with speciality) to ranks held.
    pub skills: BTreeMap<String, u32>,
    /// Full talent name to the number of times it was taken.
    pub talents: BTreeMap<String, u32>,
    /// Characteristic to the number of advances bought on it.
    pub advances: BTreeMap<String, u32>,
    pub experience: Experience,
}

/// One paid upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub line: usize,
    pub date: NaiveDate,
    pub label: String,
    /// Cost matrix type the label resolved to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub cost: i64,
    /// Whether the cost was written on the sheet rather than looked up.
    pub literal: bool,
}

/// A granted upgrade that could not be priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub line: usize,
    pub label: String,
    pub error: Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub character: Character,
    pub expenses: Vec<Expense>,
    pub failures: Vec<Failure>,
}

enum Change {
    Relative(i64),
    Absolute(i64),
}

impl Character {
    /// Starting state: the sheet's characteristics and gauges plus the
    /// aptitudes granted by its backgrounds.
    pub fn from_sheet(sheet: &Sheet, universe: &Universe) -> Result<Self, Error> {
        let mut character = Self {
            header: sheet.header.clone(),
            characteristics: sheet.characteristics.clone(),
            gauges: sheet
                .gauges
                .iter()
                .map(|gauge| (gauge.name.clone(), gauge.value))
                .collect(),
            ..Self::default()
        };

        if !universe.backgrounds.is_empty() {
            for (kind, name) in sheet.header.backgrounds() {
                let background =
                    universe
                        .find_background(kind, name)
                        .ok_or_else(|| Error::UndefinedBackground {
                            line: None,
                            kind: kind.to_string(),
                            name: name.to_string(),
                        })?;
                character.aptitudes.extend(background.aptitudes.iter().cloned());
            }
        }
        Ok(character)
    }

    /// Replay every session of `sheet`.
    ///
    /// Unpriceable upgrades are collected in [`Progression::failures`] and the
    /// replay carries on; malformed effects and duplicate talents abort it.
    pub fn progress(sheet: &Sheet, universe: &Universe) -> Result<Progression, Error> {
        let mut character = Self::from_sheet(sheet, universe)?;
        let mut expenses = Vec::new();
        let mut failures = Vec::new();

        for session in &sheet.sessions {
            if let Some(reward) = session.reward {
                character.experience.earned = character
                    .experience
                    .earned
                    .checked_add(reward)
                    .ok_or(Error::InvalidSessionReward { line: session.line })?;
            }

            for upgrade in &session.upgrades {
                let label = upgrade.label();
                let coster = universe.find_coster(&label);

                if upgrade.is_granted() {
                    let priced = match (upgrade.cost, &coster) {
                        (Some(cost), _) => Ok(cost),
                        (None, Some(coster)) => coster.cost(universe, &character),
                        (None, None) => Err(Error::UndefinedUpgradeCost {
                            line: upgrade.line,
                            label: label.clone(),
                        }),
                    };
                    match priced {
                        Ok(cost) => {
                            character.experience.spent = character
                                .experience
                                .spent
                                .checked_add(cost)
                                .ok_or(Error::InvalidUpgradeCost { line: upgrade.line })?;
                            expenses.push(Expense {
                                line: upgrade.line,
                                date: session.date,
                                label: label.clone(),
                                kind: coster.as_ref().map(Coster::kind),
                                cost,
                                literal: upgrade.cost.is_some(),
                            });
                        }
                        Err(error) => {
                            tracing::warn!(line = upgrade.line, %label, %error, "upgrade cost unresolved");
                            failures.push(Failure {
                                line: upgrade.line,
                                label: label.clone(),
                                error,
                            });
                        }
                    }
                }

                match &coster {
                    Some(coster) => character.apply(coster, upgrade, &label)?,
                    None => tracing::debug!(line = upgrade.line, %label, "upgrade has no universe entry"),
                }
            }
        }

        Ok(Progression {
            character,
            expenses,
            failures,
        })
    }

    /// Number of `aptitudes` the character holds.
    pub fn count_matching_aptitudes(&self, aptitudes: &[Aptitude]) -> u32 {
        let matching = aptitudes
            .iter()
            .filter(|aptitude| self.aptitudes.contains(*aptitude))
            .count();
        u32::try_from(matching).unwrap_or(u32::MAX)
    }

    pub fn advances(&self, characteristic: &str) -> u32 {
        self.advances.get(characteristic).copied().unwrap_or(0)
    }

    pub fn skill_rank(&self, skill: &str) -> u32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }

    fn apply(&mut self, coster: &Coster, upgrade: &Upgrade, label: &str) -> Result<(), Error> {
        let line = upgrade.line;
        let granted = upgrade.is_granted();

        match coster {
            Coster::Characteristic(characteristic) => {
                let change = parse_change(label, granted)
                    .ok_or(Error::InvalidCharacteristicValue { line })?;
                let value = self
                    .characteristics
                    .entry(characteristic.name.clone())
                    .or_insert(0);
                *value = apply_change(*value, &change, granted)
                    .ok_or(Error::InvalidCharacteristicValue { line })?;
                if let Change::Relative(delta) = change {
                    if delta > 0 {
                        adjust_count(&mut self.advances, &characteristic.name, granted);
                    }
                }
            }
            Coster::Gauge(gauge) => {
                let change = parse_change(label, granted).ok_or(Error::InvalidGaugeValue { line })?;
                let value = self.gauges.entry(gauge.name.clone()).or_insert(0);
                *value = apply_change(*value, &change, granted).ok_or(Error::InvalidGaugeValue { line })?;
            }
            Coster::Skill(skill) => adjust_count(&mut self.skills, &skill.full_name(), granted),
            Coster::Talent(talent) => {
                let name = talent.full_name();
                if granted && !talent.stackable && self.talents.contains_key(&name) {
                    return Err(Error::DuplicateTalent { line, name });
                }
                adjust_count(&mut self.talents, &name, granted);
            }
            Coster::Aptitude(aptitude) => {
                if granted {
                    self.aptitudes.insert(aptitude.clone());
                } else {
                    self.aptitudes.remove(aptitude);
                }
            }
        }
        Ok(())
    }
}

/// Value part of `NAME +N`, `NAME -N` or `NAME N`. A revoked absolute value
/// has nothing to revert to and is rejected.
fn parse_change(label: &str, granted: bool) -> Option<Change> {
    let (_, value) = label.split_once(' ')?;
    let value = value.trim();
    if let Some(delta) = value.strip_prefix('+') {
        return delta.parse().ok().map(Change::Relative);
    }
    if value.starts_with('-') {
        return value.parse().ok().map(Change::Relative);
    }
    if !granted {
        return None;
    }
    value.parse().ok().map(Change::Absolute)
}

/// New value after `change`, or `None` when it leaves the `i64` range.
fn apply_change(value: i64, change: &Change, granted: bool) -> Option<i64> {
    match (change, granted) {
        (Change::Relative(delta), true) => value.checked_add(*delta),
        (Change::Relative(delta), false) => value.checked_sub(*delta),
        (Change::Absolute(set), _) => Some(*set),
    }
}

fn adjust_count(counts: &mut BTreeMap<String, u32>, name: &str, granted: bool) {
    if granted {
        let count = counts.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        return;
    }
    if let Some(count) = counts.get_mut(name) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            counts.remove(name);
        }
    }
}
