//! The rule set a sheet is interpreted against.

mod coster;
mod costs;
mod entity;
pub mod validate;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::sheet::Vocabulary;

pub use coster::Coster;
pub use costs::CostMatrix;
pub use entity::{Aptitude, Background, Characteristic, Gauge, Skill, Talent};

/// Characteristics, skills, talents, aptitudes, gauges, backgrounds and the
/// cost matrix of one game line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    /// Background type to the entries of that type.
    #[serde(default)]
    pub backgrounds: BTreeMap<String, Vec<Background>>,
    #[serde(default)]
    pub aptitudes: Vec<Aptitude>,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    #[serde(default)]
    pub gauges: Vec<Gauge>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub talents: Vec<Talent>,
    #[serde(default)]
    pub costs: CostMatrix,
}

impl Universe {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(raw).map(Self::tag_backgrounds)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<Self>(raw).map(Self::tag_backgrounds)
    }

    /// Load a universe file; the format follows the extension (`.json`, `.yaml`, `.yml`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let universe = match extension.as_deref() {
            Some("json") => Self::from_json_str(&raw).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Some("yaml" | "yml") => Self::from_yaml_str(&raw).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        tracing::debug!(
            path = %path.display(),
            characteristics = universe.characteristics.len(),
            skills = universe.skills.len(),
            talents = universe.talents.len(),
            "loaded universe"
        );
        Ok(universe)
    }

    /// Backgrounds are listed under their type; copy the key onto each entry.
    fn tag_backgrounds(mut self) -> Self {
        for (kind, entries) in &mut self.backgrounds {
            for background in entries {
                background.kind = kind.clone();
            }
        }
        self
    }

    /// Names the sheet parser checks against.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from(self)
    }
}

impl From<&Universe> for Vocabulary {
    fn from(universe: &Universe) -> Self {
        let backgrounds: HashMap<String, Vec<String>> = universe
            .backgrounds
            .iter()
            .map(|(kind, entries)| {
                (
                    kind.clone(),
                    entries.iter().map(|background| background.name.clone()).collect(),
                )
            })
            .collect();
        Vocabulary::new(
            universe.characteristics.iter().map(|c| c.name.clone()),
            universe.gauges.iter().map(|g| g.name.clone()),
        )
        .with_backgrounds(backgrounds)
    }
}
