//! Header block: `key: value` metadata lines.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sheet::line::Line;
use crate::sheet::vocabulary::Vocabulary;

/// Recognized header keys, in canonical order.
pub const HEADER_KEYS: [&str; 5] = ["name", "origin", "background", "role", "tarot"];

/// Header keys whose value names a background of the universe.
pub const BACKGROUND_KINDS: [&str; 4] = ["origin", "background", "role", "tarot"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarot: Option<String>,
    /// Unrecognized keys (lower-cased), kept so the header renders back intact.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Header {
    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "name" => Some(&mut self.name),
            "origin" => Some(&mut self.origin),
            "background" => Some(&mut self.background),
            "role" => Some(&mut self.role),
            "tarot" => Some(&mut self.tarot),
            _ => None,
        }
    }

    /// Value of a recognized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => self.name.as_deref(),
            "origin" => self.origin.as_deref(),
            "background" => self.background.as_deref(),
            "role" => self.role.as_deref(),
            "tarot" => self.tarot.as_deref(),
            _ => None,
        }
    }

    /// Background-valued entries that are set, as `(kind, name)`.
    pub fn backgrounds(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        BACKGROUND_KINDS
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|name| (kind, name)))
    }

    pub fn is_empty(&self) -> bool {
        HEADER_KEYS.iter().all(|key| self.get(key).is_none()) && self.extra.is_empty()
    }
}

/// Parse the header block.
///
/// Keys are case-insensitive and split from the value on the first colon.
/// When the vocabulary carries background tables, background-valued keys are
/// checked against them.
pub fn parse_header(lines: &[Line], vocabulary: &Vocabulary) -> Result<Header, Error> {
    let mut header = Header::default();
    let mut seen = HashSet::new();

    for line in lines {
        let number = line.number;
        let (key, value) = line
            .text
            .split_once(':')
            .ok_or(Error::InvalidHeaderLine { line: number })?;
        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key.is_empty() {
            return Err(Error::EmptyHeaderKey { line: number });
        }
        if value.is_empty() {
            return Err(Error::EmptyHeaderValue { line: number });
        }
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateHeaderLine { line: number, key });
        }
        if BACKGROUND_KINDS.contains(&key.as_str()) {
            check_background(&key, value, number, vocabulary)?;
        }

        match header.slot_mut(&key) {
            Some(slot) => *slot = Some(value.to_string()),
            None => {
                tracing::debug!(line = number, key = %key, "ignoring unrecognized header key");
                header.extra.insert(key, value.to_string());
            }
        }
    }

    Ok(header)
}

fn check_background(kind: &str, name: &str, line: usize, vocabulary: &Vocabulary) -> Result<(), Error> {
    if !vocabulary.checks_backgrounds() {
        return Ok(());
    }
    let names = vocabulary
        .backgrounds
        .get(kind)
        .ok_or_else(|| Error::InvalidBackgroundOptions {
            line,
            kind: kind.to_string(),
        })?;
    if names.iter().any(|known| known == name) {
        Ok(())
    } else {
        Err(Error::UndefinedBackground {
            line: Some(line),
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Line::new(*text, index + 1))
            .collect()
    }

    fn parse(texts: &[&str]) -> Result<Header, Error> {
        parse_header(&lines(texts), &Vocabulary::default())
    }

    fn full_header() -> Header {
        Header {
            name: Some("successful name".to_string()),
            origin: Some("successful origin".to_string()),
            background: Some("successful background".to_string()),
            role: Some("successful role".to_string()),
            tarot: Some("successful tarot".to_string()),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn every_recognized_key_has_a_slot() {
        for key in HEADER_KEYS {
            let header = parse(&[&format!("{key}: value")]).unwrap();
            assert_eq!(header.get(key), Some("value"), "{key}");
            assert!(header.extra.is_empty(), "{key}");
            assert!(!header.is_empty());
        }
        assert!(BACKGROUND_KINDS.iter().all(|kind| HEADER_KEYS.contains(kind)));
        assert!(Header::default().is_empty());
    }

    #[test]
    fn missing_colon_is_invalid() {
        assert_eq!(parse(&["fail"]), Err(Error::InvalidHeaderLine { line: 1 }));
    }

    #[test]
    fn empty_key_and_value_are_rejected() {
        assert_eq!(parse(&[":"]), Err(Error::EmptyHeaderKey { line: 1 }));
        assert_eq!(parse(&[" : value"]), Err(Error::EmptyHeaderKey { line: 1 }));
        assert_eq!(parse(&["name:"]), Err(Error::EmptyHeaderValue { line: 1 }));
        assert_eq!(parse(&["name: \t "]), Err(Error::EmptyHeaderValue { line: 1 }));
    }

    #[test]
    fn single_key_populates_only_its_field() {
        let header = parse(&["name: success"]).unwrap();
        assert_eq!(
            header,
            Header {
                name: Some("success".to_string()),
                ..Header::default()
            }
        );
    }

    #[test]
    fn keys_are_case_insensitive_and_order_free() {
        let header = parse(&[
            "rolE: successful role",
            "name: successful name",
            "TAROT: successful tarot",
            "background: successful background",
            "Origin: successful origin",
        ])
        .unwrap();
        assert_eq!(header, full_header());
    }

    #[test]
    fn whitespace_around_key_colon_and_value_is_ignored() {
        let styles: [&[&str]; 3] = [
            &[
                "role\t: successful role",
                "name\t: successful name",
                "tarot\t: successful tarot",
                "background\t: successful background",
                "origin\t: successful origin",
            ],
            &[
                "role: \tsuccessful role",
                "name: \tsuccessful name",
                "tarot: \tsuccessful tarot",
                "background: \tsuccessful background",
                "origin: \tsuccessful origin",
            ],
            &[
                "\trole: successful role",
                "\tname: successful name",
                "\ttarot: successful tarot",
                "\tbackground: successful background",
                "\torigin: successful origin",
            ],
        ];
        for style in styles {
            assert_eq!(parse(style).unwrap(), full_header());
        }
    }

    #[test]
    fn value_keeps_colons_after_the_first() {
        let header = parse(&["name: Brother: Vox"]).unwrap();
        assert_eq!(header.name.as_deref(), Some("Brother: Vox"));
    }

    #[test]
    fn repeated_key_is_rejected_even_with_same_value() {
        assert_eq!(
            parse(&["name: A", "NAME: A"]),
            Err(Error::DuplicateHeaderLine {
                line: 2,
                key: "name".to_string()
            })
        );
        assert_eq!(
            parse(&["mood: A", "Mood: B"]),
            Err(Error::DuplicateHeaderLine {
                line: 2,
                key: "mood".to_string()
            })
        );
    }

    #[test]
    fn unrecognized_keys_are_kept_aside() {
        let header = parse(&["fail: fail", "name: someone"]).unwrap();
        assert_eq!(header.name.as_deref(), Some("someone"));
        assert_eq!(header.extra.get("fail").map(String::as_str), Some("fail"));
        assert!(header.origin.is_none());
    }

    #[test]
    fn backgrounds_are_checked_against_vocabulary_tables() {
        let mut tables = HashMap::new();
        tables.insert("origin".to_string(), vec!["Hive World".to_string()]);
        let vocabulary = Vocabulary::default().with_backgrounds(tables);

        let header = parse_header(&lines(&["origin: Hive World"]), &vocabulary).unwrap();
        assert_eq!(header.origin.as_deref(), Some("Hive World"));

        assert_eq!(
            parse_header(&lines(&["name: X", "origin: Feral World"]), &vocabulary),
            Err(Error::UndefinedBackground {
                line: Some(2),
                kind: "origin".to_string(),
                name: "Feral World".to_string(),
            })
        );
        assert_eq!(
            parse_header(&lines(&["role: Seeker"]), &vocabulary),
            Err(Error::InvalidBackgroundOptions {
                line: 1,
                kind: "role".to_string(),
            })
        );
    }

    #[test]
    fn backgrounds_lists_set_entries_in_kind_order() {
        let header = parse(&["role: Seeker", "origin: Hive World"]).unwrap();
        let listed: Vec<_> = header.backgrounds().collect();
        assert_eq!(listed, vec![("origin", "Hive World"), ("role", "Seeker")]);
    }
}
