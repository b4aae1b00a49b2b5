//! Error taxonomy for sheet parsing and cost resolution.
//!
//! Every user-correctable failure is a variant of [`Error`] carrying its own
//! positional and contextual payload. The `#[error]` attributes are the message
//! table; [`Error::code`] maps each variant to its stable [`ErrorCode`].
//!
//! [`LoadError`] covers reading and deserializing files from disk.

use std::io;
use std::path::PathBuf;

/// Stable numeric identity of an [`Error`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ErrorCode {
    InvalidCharacterSheet = 0,

    InvalidHeaderLine = 1,
    EmptyHeaderKey = 2,
    EmptyHeaderValue = 3,
    DuplicateHeaderLine = 4,
    InvalidBackgroundOptions = 5,
    UndefinedBackground = 6,

    UndefinedSessionDate = 7,
    InvalidSessionReward = 8,
    DuplicateSessionReward = 9,
    BadSessionRewardPosition = 10,

    InvalidUpgrade = 11,
    UndefinedUpgradeName = 12,
    UndefinedUpgradeCost = 13,
    InvalidUpgradeMark = 14,
    InvalidUpgradeCost = 15,
    DuplicateUpgradeCost = 16,
    BadUpgradeCostPosition = 17,
    MismatchMarkCost = 18,

    InvalidCharacteristicFormat = 19,
    InvalidCharacteristicValue = 20,
    UndefinedCharacteristic = 21,
    DuplicateCharacteristic = 22,
    MissingCharacteristic = 23,

    InvalidGaugeValue = 24,

    DuplicateTalent = 25,

    UndefinedTypeCost = 26,
    UndefinedMatchCost = 27,
    UndefinedTierCost = 28,
}

impl ErrorCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCharacterSheet => "InvalidCharacterSheet",
            Self::InvalidHeaderLine => "InvalidHeaderLine",
            Self::EmptyHeaderKey => "EmptyHeaderKey",
            Self::EmptyHeaderValue => "EmptyHeaderValue",
            Self::DuplicateHeaderLine => "DuplicateHeaderLine",
            Self::InvalidBackgroundOptions => "InvalidBackgroundOptions",
            Self::UndefinedBackground => "UndefinedBackground",
            Self::UndefinedSessionDate => "UndefinedSessionDate",
            Self::InvalidSessionReward => "InvalidSessionReward",
            Self::DuplicateSessionReward => "DuplicateSessionReward",
            Self::BadSessionRewardPosition => "BadSessionRewardPosition",
            Self::InvalidUpgrade => "InvalidUpgrade",
            Self::UndefinedUpgradeName => "UndefinedUpgradeName",
            Self::UndefinedUpgradeCost => "UndefinedUpgradeCost",
            Self::InvalidUpgradeMark => "InvalidUpgradeMark",
            Self::InvalidUpgradeCost => "InvalidUpgradeCost",
            Self::DuplicateUpgradeCost => "DuplicateUpgradeCost",
            Self::BadUpgradeCostPosition => "BadUpgradeCostPosition",
            Self::MismatchMarkCost => "MismatchMarkCost",
            Self::InvalidCharacteristicFormat => "InvalidCharacteristicFormat",
            Self::InvalidCharacteristicValue => "InvalidCharacteristicValue",
            Self::UndefinedCharacteristic => "UndefinedCharacteristic",
            Self::DuplicateCharacteristic => "DuplicateCharacteristic",
            Self::MissingCharacteristic => "MissingCharacteristic",
            Self::InvalidGaugeValue => "InvalidGaugeValue",
            Self::DuplicateTalent => "DuplicateTalent",
            Self::UndefinedTypeCost => "UndefinedTypeCost",
            Self::UndefinedMatchCost => "UndefinedMatchCost",
            Self::UndefinedTierCost => "UndefinedTierCost",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-correctable failure while parsing a sheet or pricing an upgrade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the character sheet requires at least a header block and a characteristic block")]
    InvalidCharacterSheet,

    #[error("line {line}: the header line format is invalid")]
    InvalidHeaderLine { line: usize },
    #[error("line {line}: the header line key is empty")]
    EmptyHeaderKey { line: usize },
    #[error("line {line}: the header line value is empty")]
    EmptyHeaderValue { line: usize },
    #[error("line {line}: the header line {key} is already set")]
    DuplicateHeaderLine { line: usize, key: String },
    #[error("line {line}: the background options for {kind} are not defined by the universe")]
    InvalidBackgroundOptions { line: usize, kind: String },
    #[error("{}the {kind} {name} is not defined by the universe", line_prefix(.line))]
    UndefinedBackground {
        line: Option<usize>,
        kind: String,
        name: String,
    },

    #[error("line {line}: the session date is not defined")]
    UndefinedSessionDate { line: usize },
    #[error("line {line}: the session reward is invalid")]
    InvalidSessionReward { line: usize },
    #[error("line {line}: the session reward is already set")]
    DuplicateSessionReward { line: usize },
    #[error("line {line}: bad session reward position")]
    BadSessionRewardPosition { line: usize },

    #[error("line {line}: the upgrade format is invalid")]
    InvalidUpgrade { line: usize },
    #[error("line {line}: the upgrade name is not defined")]
    UndefinedUpgradeName { line: usize },
    #[error("line {line}: the cost of upgrade {label} is not defined")]
    UndefinedUpgradeCost { line: usize, label: String },
    #[error("line {line}: the upgrade mark {mark:?} is invalid")]
    InvalidUpgradeMark { line: usize, mark: String },
    #[error("line {line}: the upgrade cost is invalid")]
    InvalidUpgradeCost { line: usize },
    #[error("line {line}: the upgrade cost is already set")]
    DuplicateUpgradeCost { line: usize },
    #[error("line {line}: bad upgrade cost position")]
    BadUpgradeCostPosition { line: usize },
    #[error("line {line}: upgrade with mark \"-\" expects no cost")]
    MismatchMarkCost { line: usize },

    #[error("line {line}: the characteristic format is invalid")]
    InvalidCharacteristicFormat { line: usize },
    #[error("line {line}: the characteristic value is invalid")]
    InvalidCharacteristicValue { line: usize },
    #[error("line {line}: the characteristic {name} is not defined")]
    UndefinedCharacteristic { line: usize, name: String },
    #[error("line {line}: the characteristic {name} is already set")]
    DuplicateCharacteristic { line: usize, name: String },
    #[error("the characteristic {name} is not defined for the character")]
    MissingCharacteristic { name: String },

    #[error("line {line}: the gauge value is invalid")]
    InvalidGaugeValue { line: usize },

    #[error("line {line}: the talent {name} is already set")]
    DuplicateTalent { line: usize, name: String },

    #[error("undefined cost for type {kind}")]
    UndefinedTypeCost { kind: String },
    #[error("undefined cost for type {kind} with {matches} matching aptitudes")]
    UndefinedMatchCost { kind: String, matches: u32 },
    #[error("undefined cost for type {kind} with {matches} matching aptitudes on tier {tier}")]
    UndefinedTierCost {
        kind: String,
        matches: u32,
        tier: u32,
    },
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|line| format!("line {line}: ")).unwrap_or_default()
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCharacterSheet => ErrorCode::InvalidCharacterSheet,
            Self::InvalidHeaderLine { .. } => ErrorCode::InvalidHeaderLine,
            Self::EmptyHeaderKey { .. } => ErrorCode::EmptyHeaderKey,
            Self::EmptyHeaderValue { .. } => ErrorCode::EmptyHeaderValue,
            Self::DuplicateHeaderLine { .. } => ErrorCode::DuplicateHeaderLine,
            Self::InvalidBackgroundOptions { .. } => ErrorCode::InvalidBackgroundOptions,
            Self::UndefinedBackground { .. } => ErrorCode::UndefinedBackground,
            Self::UndefinedSessionDate { .. } => ErrorCode::UndefinedSessionDate,
            Self::InvalidSessionReward { .. } => ErrorCode::InvalidSessionReward,
            Self::DuplicateSessionReward { .. } => ErrorCode::DuplicateSessionReward,
            Self::BadSessionRewardPosition { .. } => ErrorCode::BadSessionRewardPosition,
            Self::InvalidUpgrade { .. } => ErrorCode::InvalidUpgrade,
            Self::UndefinedUpgradeName { .. } => ErrorCode::UndefinedUpgradeName,
            Self::UndefinedUpgradeCost { .. } => ErrorCode::UndefinedUpgradeCost,
            Self::InvalidUpgradeMark { .. } => ErrorCode::InvalidUpgradeMark,
            Self::InvalidUpgradeCost { .. } => ErrorCode::InvalidUpgradeCost,
            Self::DuplicateUpgradeCost { .. } => ErrorCode::DuplicateUpgradeCost,
            Self::BadUpgradeCostPosition { .. } => ErrorCode::BadUpgradeCostPosition,
            Self::MismatchMarkCost { .. } => ErrorCode::MismatchMarkCost,
            Self::InvalidCharacteristicFormat { .. } => ErrorCode::InvalidCharacteristicFormat,
            Self::InvalidCharacteristicValue { .. } => ErrorCode::InvalidCharacteristicValue,
            Self::UndefinedCharacteristic { .. } => ErrorCode::UndefinedCharacteristic,
            Self::DuplicateCharacteristic { .. } => ErrorCode::DuplicateCharacteristic,
            Self::MissingCharacteristic { .. } => ErrorCode::MissingCharacteristic,
            Self::InvalidGaugeValue { .. } => ErrorCode::InvalidGaugeValue,
            Self::DuplicateTalent { .. } => ErrorCode::DuplicateTalent,
            Self::UndefinedTypeCost { .. } => ErrorCode::UndefinedTypeCost,
            Self::UndefinedMatchCost { .. } => ErrorCode::UndefinedMatchCost,
            Self::UndefinedTierCost { .. } => ErrorCode::UndefinedTierCost,
        }
    }

    /// Line the failure points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidHeaderLine { line }
            | Self::EmptyHeaderKey { line }
            | Self::EmptyHeaderValue { line }
            | Self::DuplicateHeaderLine { line, .. }
            | Self::InvalidBackgroundOptions { line, .. }
            | Self::UndefinedSessionDate { line }
            | Self::InvalidSessionReward { line }
            | Self::DuplicateSessionReward { line }
            | Self::BadSessionRewardPosition { line }
            | Self::InvalidUpgrade { line }
            | Self::UndefinedUpgradeName { line }
            | Self::UndefinedUpgradeCost { line, .. }
            | Self::InvalidUpgradeMark { line, .. }
            | Self::InvalidUpgradeCost { line }
            | Self::DuplicateUpgradeCost { line }
            | Self::BadUpgradeCostPosition { line }
            | Self::MismatchMarkCost { line }
            | Self::InvalidCharacteristicFormat { line }
            | Self::InvalidCharacteristicValue { line }
            | Self::UndefinedCharacteristic { line, .. }
            | Self::DuplicateCharacteristic { line, .. }
            | Self::InvalidGaugeValue { line }
            | Self::DuplicateTalent { line, .. } => Some(*line),
            Self::UndefinedBackground { line, .. } => *line,
            Self::InvalidCharacterSheet
            | Self::MissingCharacteristic { .. }
            | Self::UndefinedTypeCost { .. }
            | Self::UndefinedMatchCost { .. }
            | Self::UndefinedTierCost { .. } => None,
        }
    }
}

/// Failure to read or deserialize a document from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse JSON {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse YAML {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported universe format for {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Sheet {
        path: PathBuf,
        #[source]
        source: Error,
    },
}
