//! Character sheet parsing and experience accounting for tabletop RPG
//! campaigns.
//!
//! A [`Sheet`] is read from a plain-text file with a strict line grammar and
//! replayed against a [`Universe`] (the game line's rule set) to price every
//! upgrade and compute the resulting [`Character`].

pub mod character;
pub mod cli;
pub mod error;
pub mod sheet;
pub mod universe;

pub use character::{Character, Expense, Experience, Failure, Progression};
pub use error::{Error, ErrorCode, LoadError};
pub use sheet::{parse_sheet, parse_sheet_with, ParseOptions, Sheet, Vocabulary};
pub use universe::{Coster, CostMatrix, Universe};
