//! Rule entities described by a universe.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named category counted against an entity's aptitudes to price it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aptitude(pub String);

impl Aptitude {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Aptitude {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for Aptitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
}

/// A trained ability, optionally narrowed by a speciality (`Common Lore: Dark Gods`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
    /// Set by lookup from the label, never read from the universe.
    #[serde(skip)]
    pub speciality: Option<String>,
}

impl Skill {
    pub fn full_name(&self) -> String {
        full_name(&self.name, self.speciality.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
    pub tier: u32,
    /// Prerequisites written as upgrade labels (`WP 35`, `Jaded`). Carried for
    /// display and validation; progression does not enforce them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    /// Whether the talent may be taken more than once.
    #[serde(default)]
    pub stackable: bool,
    #[serde(skip)]
    pub speciality: Option<String>,
}

impl Talent {
    pub fn full_name(&self) -> String {
        full_name(&self.name, self.speciality.as_deref())
    }
}

/// A named counter such as fate points or corruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
}

/// An origin, background, role or tarot entry. `kind` is the key of the table
/// the entry was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
    #[serde(skip)]
    pub kind: String,
}

fn full_name(name: &str, speciality: Option<&str>) -> String {
    match speciality {
        Some(speciality) => format!("{name}: {speciality}"),
        None => name.to_string(),
    }
}
