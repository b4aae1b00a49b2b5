//! Sheet assembler: drives the block parsers over the whole document.
//!
//! The grammar is strict and single-pass. Block 1 is the header, block 2 the
//! characteristics, every later block belongs to sessions: an unindented line
//! opens a session and indented lines are upgrades of the open one. A line is
//! always handed to the parser of the current state; it is never reinterpreted
//! as the start of another block.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, LoadError};
use crate::sheet::characteristic::{missing_characteristic, parse_characteristics, CharacteristicBlock, GaugeValue};
use crate::sheet::header::{parse_header, Header};
use crate::sheet::line::{read_blocks, Line};
use crate::sheet::session::{parse_session, Session, DEFAULT_DATE_SEPARATORS};
use crate::sheet::upgrade::{parse_upgrade, Upgrade};
use crate::sheet::vocabulary::Vocabulary;

/// Parser settings beyond the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Characters accepted between the fields of a session date.
    pub date_separators: Vec<char>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            date_separators: DEFAULT_DATE_SEPARATORS.to_vec(),
        }
    }
}

/// A parsed character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub header: Header,
    pub characteristics: BTreeMap<String, i64>,
    #[serde(default)]
    pub gauges: Vec<GaugeValue>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Sheet {
    pub fn parse(input: &str, vocabulary: &Vocabulary) -> Result<Self, Error> {
        parse_sheet(input, vocabulary)
    }

    /// Read and parse a sheet file.
    pub fn load(path: impl AsRef<Path>, vocabulary: &Vocabulary, options: &ParseOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_sheet_with(&raw, vocabulary, options).map_err(|source| LoadError::Sheet {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every upgrade with the session it belongs to, in play order.
    pub fn upgrades(&self) -> impl Iterator<Item = (&Session, &Upgrade)> {
        self.sessions
            .iter()
            .flat_map(|session| session.upgrades.iter().map(move |upgrade| (session, upgrade)))
    }

    /// Sum of the session rewards, `None` if it overflows.
    pub fn total_reward(&self) -> Option<i64> {
        self.sessions
            .iter()
            .filter_map(|session| session.reward)
            .try_fold(0i64, i64::checked_add)
    }
}

pub fn parse_sheet(input: &str, vocabulary: &Vocabulary) -> Result<Sheet, Error> {
    parse_sheet_with(input, vocabulary, &ParseOptions::default())
}

pub fn parse_sheet_with(input: &str, vocabulary: &Vocabulary, options: &ParseOptions) -> Result<Sheet, Error> {
    let blocks = read_blocks(input)?;

    let mut state = State::AwaitHeader;
    for block in &blocks {
        state = state.feed_block(block, vocabulary, options)?;
    }

    let sheet = state.finish()?;
    tracing::debug!(
        sessions = sheet.sessions.len(),
        upgrades = sheet.upgrades().count(),
        "parsed character sheet"
    );
    Ok(sheet)
}

enum State {
    AwaitHeader,
    AwaitCharacteristics {
        header: Header,
    },
    AwaitSession {
        header: Header,
        block: CharacteristicBlock,
    },
    /// The last session is open and receives indented upgrade lines.
    InSession {
        header: Header,
        block: CharacteristicBlock,
        sessions: Vec<Session>,
    },
}

impl State {
    fn feed_block(self, lines: &[Line], vocabulary: &Vocabulary, options: &ParseOptions) -> Result<Self, Error> {
        match self {
            Self::AwaitHeader => {
                let header = parse_header(lines, vocabulary)?;
                Ok(Self::AwaitCharacteristics { header })
            }
            Self::AwaitCharacteristics { header } => {
                let block = parse_characteristics(lines, vocabulary)?;
                if let Some(missing) = missing_characteristic(&block.characteristics, vocabulary) {
                    return Err(missing);
                }
                Ok(Self::AwaitSession { header, block })
            }
            state @ (Self::AwaitSession { .. } | Self::InSession { .. }) => lines
                .iter()
                .try_fold(state, |state, line| state.feed_session_line(line, options)),
        }
    }

    fn feed_session_line(self, line: &Line, options: &ParseOptions) -> Result<Self, Error> {
        match self {
            Self::AwaitSession { header, block } => {
                if line.indented {
                    return Err(Error::UndefinedSessionDate { line: line.number });
                }
                let session = parse_session(line, &options.date_separators)?;
                Ok(Self::InSession {
                    header,
                    block,
                    sessions: vec![session],
                })
            }
            Self::InSession {
                header,
                block,
                mut sessions,
            } => {
                if line.indented {
                    let upgrade = parse_upgrade(line)?;
                    if let Some(open) = sessions.last_mut() {
                        open.upgrades.push(upgrade);
                    }
                } else {
                    sessions.push(parse_session(line, &options.date_separators)?);
                }
                Ok(Self::InSession {
                    header,
                    block,
                    sessions,
                })
            }
            Self::AwaitHeader | Self::AwaitCharacteristics { .. } => Err(Error::InvalidCharacterSheet),
        }
    }

    fn finish(self) -> Result<Sheet, Error> {
        match self {
            Self::AwaitSession { header, block } => Ok(Sheet {
                header,
                characteristics: block.characteristics,
                gauges: block.gauges,
                sessions: Vec::new(),
            }),
            Self::InSession {
                header,
                block,
                sessions,
            } => Ok(Sheet {
                header,
                characteristics: block.characteristics,
                gauges: block.gauges,
                sessions,
            }),
            Self::AwaitHeader | Self::AwaitCharacteristics { .. } => Err(Error::InvalidCharacterSheet),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::sheet::upgrade::Mark;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(["STR", "TOU"], ["Fate"])
    }

    const HEADER: &str = "Name: Someone\nOrigin: Somewhere\nBackground: Something\nRole: Warmonger\nTarot: XXI\n";

    #[test]
    fn header_and_characteristics_without_sessions() {
        let sheet = parse_sheet(&format!("{HEADER}\nSTR 30\nTOU 35\nFate 2\n"), &vocabulary()).unwrap();
        assert_eq!(sheet.header.name.as_deref(), Some("Someone"));
        assert_eq!(sheet.header.tarot.as_deref(), Some("XXI"));
        assert_eq!(sheet.characteristics.len(), 2);
        assert_eq!(sheet.gauges.len(), 1);
        assert!(sheet.sessions.is_empty());
    }

    #[test]
    fn sessions_collect_indented_upgrades_in_order() {
        let input = format!(
            "{HEADER}\nSTR 30\nTOU 35\n\n2015/06/01 Creation [500]\n\t* STR +5 [250]\n\t- Awesomeskill\n2015/06/08\n  * Peanuts [20]\n"
        );
        let sheet = parse_sheet(&input, &vocabulary()).unwrap();
        assert_eq!(sheet.sessions.len(), 2);

        let creation = &sheet.sessions[0];
        assert_eq!(creation.date, NaiveDate::from_ymd_opt(2015, 6, 1).unwrap());
        assert_eq!(creation.title.as_deref(), Some("Creation"));
        assert_eq!(creation.reward, Some(500));
        assert_eq!(creation.upgrades.len(), 2);
        assert_eq!(creation.upgrades[0].name, "STR +5");
        assert_eq!(creation.upgrades[1].mark, Mark::Revoked);

        assert_eq!(sheet.sessions[1].upgrades[0].name, "Peanuts");
        assert_eq!(sheet.total_reward(), Some(500));
        assert_eq!(sheet.upgrades().count(), 3);
    }

    #[test]
    fn total_reward_reports_overflow() {
        let input = "name: A\n\nSTR 1\nTOU 1\n\n2015/06/01 [9223372036854775807]\n2015/06/02 [1]\n";
        let sheet = parse_sheet(input, &vocabulary()).unwrap();
        assert_eq!(sheet.total_reward(), None);
    }

    #[test]
    fn blank_lines_do_not_close_a_session() {
        let input = "name: A\n\nSTR 1\nTOU 1\n\n2015/06/01\n\t* One [1]\n\n\t* Two [2]\n";
        let sheet = parse_sheet(input, &vocabulary()).unwrap();
        assert_eq!(sheet.sessions.len(), 1);
        assert_eq!(sheet.sessions[0].upgrades.len(), 2);
    }

    #[test]
    fn upgrade_before_any_session_has_no_date() {
        let input = "name: A\n\nSTR 1\nTOU 1\n\n\t* Orphan [1]\n";
        assert_eq!(
            parse_sheet(input, &vocabulary()),
            Err(Error::UndefinedSessionDate { line: 4 })
        );
    }

    #[test]
    fn block_errors_are_not_reinterpreted() {
        // The second block is read as characteristics even though it looks like a session.
        let input = "name: Celeste\n\n2015/08/10 Babar love celeste\n\t* Peanuts [200]\n";
        assert_eq!(
            parse_sheet(input, &vocabulary()),
            Err(Error::InvalidCharacteristicFormat { line: 2 })
        );

        let input = "Name: Celeste\n\nBabar love celeste\nBabar also love peanuts\n";
        assert_eq!(
            parse_sheet(input, &vocabulary()),
            Err(Error::InvalidCharacteristicFormat { line: 2 })
        );
    }

    #[test]
    fn missing_characteristic_is_reported_after_the_block() {
        let input = "name: A\n\nSTR 1\n";
        assert_eq!(
            parse_sheet(input, &vocabulary()),
            Err(Error::MissingCharacteristic {
                name: "TOU".to_string()
            })
        );
    }

    #[test]
    fn line_numbers_skip_comments_and_blank_lines() {
        let input = "# intro\nname: A\n\n// stats\nSTR 1\nTOU 1\n\n2015/06/01\n\t* Bad [x]\n";
        assert_eq!(
            parse_sheet(input, &vocabulary()),
            Err(Error::InvalidUpgradeCost { line: 5 })
        );
    }

    #[test]
    fn empty_documents_are_invalid() {
        assert_eq!(parse_sheet("", &vocabulary()), Err(Error::InvalidCharacterSheet));
        assert_eq!(
            parse_sheet("# only a comment\n// and another\n", &vocabulary()),
            Err(Error::InvalidCharacterSheet)
        );
        assert_eq!(parse_sheet(HEADER, &vocabulary()), Err(Error::InvalidCharacterSheet));
    }

    #[test]
    fn custom_date_separators() {
        let options = ParseOptions {
            date_separators: vec!['-'],
        };
        let input = "name: A\n\nSTR 1\nTOU 1\n\n2015/06/01\n";
        assert_eq!(
            parse_sheet_with(input, &vocabulary(), &options),
            Err(Error::UndefinedSessionDate { line: 4 })
        );
    }
}
