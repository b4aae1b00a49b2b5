//! Cost matrix: `type -> matching aptitudes -> tier -> price`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

type ByTier = BTreeMap<u32, i64>;
type ByMatches = BTreeMap<u32, ByTier>;

/// Sparse price table. Every combination that gets priced must be present:
/// there is no default and no interpolation between tiers or match counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostMatrix(BTreeMap<String, ByMatches>);

impl CostMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for tests and fixtures.
    #[must_use]
    pub fn with(mut self, kind: &str, matches: u32, tier: u32, price: i64) -> Self {
        self.insert(kind, matches, tier, price);
        self
    }

    pub fn insert(&mut self, kind: &str, matches: u32, tier: u32, price: i64) {
        self.0
            .entry(kind.to_string())
            .or_default()
            .entry(matches)
            .or_default()
            .insert(tier, price);
    }

    /// Price of an upgrade of type `kind` with `matches` matching aptitudes on `tier`.
    pub fn price(&self, kind: &str, matches: u32, tier: u32) -> Result<i64, Error> {
        let by_matches = self.0.get(kind).ok_or_else(|| Error::UndefinedTypeCost {
            kind: kind.to_string(),
        })?;
        let by_tier = by_matches
            .get(&matches)
            .ok_or_else(|| Error::UndefinedMatchCost {
                kind: kind.to_string(),
                matches,
            })?;
        by_tier.get(&tier).copied().ok_or_else(|| Error::UndefinedTierCost {
            kind: kind.to_string(),
            matches,
            tier,
        })
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.0.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CostMatrix {
        CostMatrix::new().with("talent", 2, 1, 100)
    }

    #[test]
    fn exact_entry_is_priced() {
        assert_eq!(matrix().price("talent", 2, 1), Ok(100));
    }

    #[test]
    fn each_missing_layer_has_its_own_error() {
        assert_eq!(
            matrix().price("ranged", 2, 1),
            Err(Error::UndefinedTypeCost {
                kind: "ranged".to_string()
            })
        );
        assert_eq!(
            matrix().price("talent", 3, 1),
            Err(Error::UndefinedMatchCost {
                kind: "talent".to_string(),
                matches: 3
            })
        );
        assert_eq!(
            matrix().price("talent", 2, 2),
            Err(Error::UndefinedTierCost {
                kind: "talent".to_string(),
                matches: 2,
                tier: 2
            })
        );
    }

    #[test]
    fn neighbouring_entries_are_not_used_as_defaults() {
        let matrix = matrix().with("talent", 2, 3, 300).with("talent", 0, 2, 50);
        assert!(matrix.price("talent", 2, 2).is_err());
        assert!(matrix.price("talent", 1, 2).is_err());
    }

    #[test]
    fn deserializes_from_json_with_string_keys() {
        let matrix: CostMatrix =
            serde_json::from_str(r#"{"talent": {"2": {"1": 100, "2": 200}}, "skill": {"0": {"1": 200}}}"#).unwrap();
        assert_eq!(matrix.price("talent", 2, 2), Ok(200));
        assert_eq!(matrix.price("skill", 0, 1), Ok(200));
        assert_eq!(matrix.kinds().collect::<Vec<_>>(), vec!["skill", "talent"]);
    }

    #[test]
    fn deserializes_from_yaml_with_integer_keys() {
        let matrix: CostMatrix = serde_yaml::from_str("talent:\n  2:\n    1: 100\n").unwrap();
        assert_eq!(matrix.price("talent", 2, 1), Ok(100));
    }
}
