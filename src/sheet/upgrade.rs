//! Upgrade lines: `MARK NAME[: SPECIALITY] [[COST]]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sheet::line::Line;
use crate::sheet::token::{self, BracketFault};

/// Whether an upgrade is granted (`*`) or revoked (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[serde(rename = "*")]
    Granted,
    #[serde(rename = "-")]
    Revoked,
}

impl Mark {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Self::Granted),
            "-" => Some(Self::Revoked),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Granted => '*',
            Self::Revoked => '-',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single advance bought or removed during a session.
///
/// `cost` is the literal bracketed value of the line, if any; prices of
/// upgrades without one are resolved later against the universe. The source
/// line is diagnostic only and does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upgrade {
    pub mark: Mark,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speciality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(default)]
    pub line: usize,
}

impl PartialEq for Upgrade {
    fn eq(&self, other: &Self) -> bool {
        self.mark == other.mark
            && self.name == other.name
            && self.speciality == other.speciality
            && self.cost == other.cost
    }
}

impl Eq for Upgrade {}

impl Upgrade {
    /// Name and speciality as written on the sheet, e.g. `Common Lore: Dark Gods`.
    pub fn label(&self) -> String {
        match &self.speciality {
            Some(speciality) => format!("{}: {}", self.name, speciality),
            None => self.name.clone(),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.mark == Mark::Granted
    }
}

pub fn parse_upgrade(line: &Line) -> Result<Upgrade, Error> {
    let number = line.number;
    let text = line.text.as_str();
    let (token, body) = match text.split_once(char::is_whitespace) {
        Some((token, body)) => (token, body.trim()),
        None => (text, ""),
    };

    let mark = match Mark::from_token(token) {
        Some(mark) => mark,
        None if token.chars().all(|c| c.is_ascii_punctuation()) => {
            return Err(Error::InvalidUpgradeMark {
                line: number,
                mark: token.to_string(),
            });
        }
        None => return Err(Error::InvalidUpgrade { line: number }),
    };

    if mark == Mark::Revoked && body.ends_with(']') {
        return Err(Error::MismatchMarkCost { line: number });
    }

    let mut body = body;
    let mut cost = None;
    match token::trailing(body) {
        Ok(Some(bracketed)) => {
            if bracketed.rest.ends_with(']') {
                return Err(Error::DuplicateUpgradeCost { line: number });
            }
            if bracketed.glued {
                return Err(Error::BadUpgradeCostPosition { line: number });
            }
            cost = Some(token::integer(bracketed.content).ok_or(Error::InvalidUpgradeCost { line: number })?);
            body = bracketed.rest;
        }
        Ok(None) => {}
        Err(fault) => return Err(cost_fault(fault, number)),
    }

    if let Some(fault) = token::stray(body) {
        return Err(cost_fault(fault, number));
    }

    let (name, speciality) = match body.split_once(':') {
        Some((name, speciality)) => {
            let speciality = token::collapse(speciality);
            (token::collapse(name), Some(speciality).filter(|s| !s.is_empty()))
        }
        None => (token::collapse(body), None),
    };
    if name.is_empty() {
        return Err(Error::UndefinedUpgradeName { line: number });
    }

    Ok(Upgrade {
        mark,
        name,
        speciality,
        cost,
        line: number,
    })
}

fn cost_fault(fault: BracketFault, line: usize) -> Error {
    match fault {
        BracketFault::Unbalanced => Error::InvalidUpgradeCost { line },
        BracketFault::Misplaced => Error::BadUpgradeCostPosition { line },
    }
}
