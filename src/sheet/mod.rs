//! Character sheet parsing: the line grammar and the typed document it yields.

pub mod characteristic;
pub mod header;
pub mod line;
pub mod parser;
mod render;
pub mod session;
mod token;
pub mod upgrade;
pub mod vocabulary;

pub use characteristic::{parse_characteristics, CharacteristicBlock, GaugeValue};
pub use header::{parse_header, Header, BACKGROUND_KINDS, HEADER_KEYS};
pub use line::{read_blocks, Block, Line};
pub use parser::{parse_sheet, parse_sheet_with, ParseOptions, Sheet};
pub use session::{parse_date, parse_session, Session, DEFAULT_DATE_SEPARATORS};
pub use upgrade::{parse_upgrade, Mark, Upgrade};
pub use vocabulary::Vocabulary;
