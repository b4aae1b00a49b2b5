//! Session lines: `DATE [TITLE] [[REWARD]]`, followed by indented upgrades.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sheet::line::Line;
use crate::sheet::token::{self, BracketFault};
use crate::sheet::upgrade::Upgrade;

/// Date separators accepted when none are configured.
pub const DEFAULT_DATE_SEPARATORS: [char; 3] = ['/', '-', '.'];

/// One play session and the upgrades bought during it, in play order.
///
/// The source line is diagnostic only and does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<i64>,
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
    #[serde(default)]
    pub line: usize,
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.title == other.title
            && self.reward == other.reward
            && self.upgrades == other.upgrades
    }
}

impl Eq for Session {}

/// Parse a session line. Upgrades are attached by the assembler.
pub fn parse_session(line: &Line, separators: &[char]) -> Result<Session, Error> {
    let number = line.number;
    let text = line.text.as_str();
    let (date, rest) = match text.split_once(char::is_whitespace) {
        Some((date, rest)) => (date, rest.trim()),
        None => (text, ""),
    };
    let date = parse_date(date, separators).ok_or(Error::UndefinedSessionDate { line: number })?;

    let mut rest = rest;
    let mut reward = None;

    match token::leading(rest) {
        Ok(Some(bracketed)) => {
            if bracketed.rest.starts_with('[') {
                return Err(Error::DuplicateSessionReward { line: number });
            }
            if bracketed.glued {
                return Err(Error::BadSessionRewardPosition { line: number });
            }
            reward = Some(parse_reward(bracketed.content, number)?);
            rest = bracketed.rest;
        }
        Ok(None) => {}
        Err(fault) => return Err(reward_fault(fault, number)),
    }

    match token::trailing(rest) {
        Ok(Some(bracketed)) => {
            if reward.is_some() || bracketed.rest.ends_with(']') {
                return Err(Error::DuplicateSessionReward { line: number });
            }
            if bracketed.glued {
                return Err(Error::BadSessionRewardPosition { line: number });
            }
            reward = Some(parse_reward(bracketed.content, number)?);
            rest = bracketed.rest;
        }
        Ok(None) => {}
        Err(fault) => return Err(reward_fault(fault, number)),
    }

    if let Some(fault) = token::stray(rest) {
        return Err(reward_fault(fault, number));
    }

    let title = Some(token::collapse(rest)).filter(|title| !title.is_empty());

    Ok(Session {
        date,
        title,
        reward,
        upgrades: Vec::new(),
        line: number,
    })
}

/// Parse `YYYY<sep>MM<sep>DD` with a single separator taken from `separators`.
pub fn parse_date(token: &str, separators: &[char]) -> Option<NaiveDate> {
    let separator = separators.iter().copied().find(|sep| token.contains(*sep))?;
    let fields: Vec<&str> = token.split(separator).collect();
    let &[year, month, day] = fields.as_slice() else {
        return None;
    };
    let numeric = |field: &str| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit());
    if !(numeric(year) && numeric(month) && numeric(day)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_reward(content: &str, line: usize) -> Result<i64, Error> {
    token::integer(content).ok_or(Error::InvalidSessionReward { line })
}

fn reward_fault(fault: BracketFault, line: usize) -> Error {
    match fault {
        BracketFault::Unbalanced => Error::InvalidSessionReward { line },
        BracketFault::Misplaced => Error::BadSessionRewardPosition { line },
    }
}
