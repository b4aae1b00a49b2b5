//! Characteristic block: `NAME VALUE` lines for characteristics and gauges.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sheet::line::Line;
use crate::sheet::vocabulary::Vocabulary;

/// A named counter set in the characteristic block (fate points, insanity...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeValue {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacteristicBlock {
    pub characteristics: BTreeMap<String, i64>,
    pub gauges: Vec<GaugeValue>,
}

/// Parse the characteristic block. Completeness is not checked here, see
/// [`missing_characteristic`].
pub fn parse_characteristics(lines: &[Line], vocabulary: &Vocabulary) -> Result<CharacteristicBlock, Error> {
    let mut block = CharacteristicBlock::default();
    let mut seen = HashSet::new();

    for line in lines {
        let number = line.number;
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        let &[name, value] = tokens.as_slice() else {
            return Err(Error::InvalidCharacteristicFormat { line: number });
        };

        let is_characteristic = vocabulary.is_characteristic(name);
        if !is_characteristic && !vocabulary.is_gauge(name) {
            return Err(Error::UndefinedCharacteristic {
                line: number,
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(Error::DuplicateCharacteristic {
                line: number,
                name: name.to_string(),
            });
        }

        if is_characteristic {
            let value = value
                .parse::<i64>()
                .map_err(|_| Error::InvalidCharacteristicValue { line: number })?;
            block.characteristics.insert(name.to_string(), value);
        } else {
            let value = value
                .parse::<i64>()
                .map_err(|_| Error::InvalidGaugeValue { line: number })?;
            block.gauges.push(GaugeValue {
                name: name.to_string(),
                value,
            });
        }
    }

    Ok(block)
}

/// First required characteristic, in vocabulary order, that was never set.
pub fn missing_characteristic(characteristics: &BTreeMap<String, i64>, vocabulary: &Vocabulary) -> Option<Error> {
    vocabulary
        .characteristics
        .iter()
        .find(|name| !characteristics.contains_key(name.as_str()))
        .map(|name| Error::MissingCharacteristic { name: name.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(["WS", "BS", "STR"], ["Fate", "Insanity"])
    }

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Line::new(*text, index + 1))
            .collect()
    }

    fn parse(texts: &[&str]) -> Result<CharacteristicBlock, Error> {
        parse_characteristics(&lines(texts), &vocabulary())
    }

    #[test]
    fn complete_block_with_gauges() {
        let block = parse(&["WS 35", "Fate 3", "BS\t40", "STR   -2", "Insanity 0"]).unwrap();
        assert_eq!(block.characteristics.len(), 3);
        assert_eq!(block.characteristics["WS"], 35);
        assert_eq!(block.characteristics["STR"], -2);
        assert_eq!(
            block.gauges,
            vec![
                GaugeValue {
                    name: "Fate".to_string(),
                    value: 3
                },
                GaugeValue {
                    name: "Insanity".to_string(),
                    value: 0
                },
            ]
        );
        assert_eq!(missing_characteristic(&block.characteristics, &vocabulary()), None);
    }

    #[test]
    fn lines_need_exactly_two_tokens() {
        assert_eq!(parse(&["WS"]), Err(Error::InvalidCharacteristicFormat { line: 1 }));
        assert_eq!(
            parse(&["WS 35", "BS 40 12"]),
            Err(Error::InvalidCharacteristicFormat { line: 2 })
        );
    }

    #[test]
    fn values_must_be_integers() {
        assert_eq!(parse(&["WS high"]), Err(Error::InvalidCharacteristicValue { line: 1 }));
        assert_eq!(parse(&["Fate 1.5"]), Err(Error::InvalidGaugeValue { line: 1 }));
    }

    #[test]
    fn unknown_and_repeated_names_are_rejected() {
        assert_eq!(
            parse(&["WS 35", "AGI 30"]),
            Err(Error::UndefinedCharacteristic {
                line: 2,
                name: "AGI".to_string()
            })
        );
        assert_eq!(
            parse(&["WS 35", "WS 35"]),
            Err(Error::DuplicateCharacteristic {
                line: 2,
                name: "WS".to_string()
            })
        );
        assert_eq!(
            parse(&["Fate 1", "Fate 2"]),
            Err(Error::DuplicateCharacteristic {
                line: 2,
                name: "Fate".to_string()
            })
        );
    }

    #[test]
    fn repeated_name_wins_over_a_bad_value() {
        assert_eq!(
            parse(&["WS 35", "WS abc"]),
            Err(Error::DuplicateCharacteristic {
                line: 2,
                name: "WS".to_string()
            })
        );
        assert_eq!(
            parse(&["Fate 1", "Fate lots"]),
            Err(Error::DuplicateCharacteristic {
                line: 2,
                name: "Fate".to_string()
            })
        );
    }

    #[test]
    fn missing_characteristic_names_the_first_absent_one() {
        for removed in ["WS", "BS", "STR"] {
            let texts: Vec<String> = ["WS", "BS", "STR"]
                .iter()
                .filter(|name| **name != removed)
                .map(|name| format!("{name} 30"))
                .collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let block = parse(&refs).unwrap();
            assert_eq!(
                missing_characteristic(&block.characteristics, &vocabulary()),
                Some(Error::MissingCharacteristic {
                    name: removed.to_string()
                })
            );
        }
    }
}
