//! Line reader: splits raw text into numbered lines grouped in blocks.
//!
//! Blank lines end a block. Comment lines (`#` or `//`) are dropped without
//! ending a block and without taking a line number, so numbers count retained
//! lines only (1-based).

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A retained line of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Text with leading and trailing whitespace stripped.
    pub text: String,
    pub number: usize,
    /// Whether the raw line started with whitespace.
    pub indented: bool,
}

impl Line {
    pub fn new(text: impl Into<String>, number: usize) -> Self {
        let raw = text.into();
        let indented = raw.starts_with(char::is_whitespace);
        Self {
            text: raw.trim().to_string(),
            number,
            indented,
        }
    }
}

/// Contiguous lines not separated by a blank line.
pub type Block = Vec<Line>;

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Read `input` into blocks of numbered lines.
///
/// Fails with [`Error::InvalidCharacterSheet`] when no line survives or fewer
/// than two blocks are found: a sheet needs at least a header and a
/// characteristic block.
pub fn read_blocks(input: &str) -> Result<Vec<Block>, Error> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Block = Vec::new();
    let mut number = 0;

    for raw in input.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }
        number += 1;
        current.push(Line::new(raw, number));
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    tracing::debug!(lines = number, blocks = blocks.len(), "read sheet lines");

    if blocks.len() < 2 {
        return Err(Error::InvalidCharacterSheet);
    }
    Ok(blocks)
}
