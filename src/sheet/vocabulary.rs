//! Lookup tables the parser validates names against.

use std::collections::HashMap;

/// Names known to the parser: the characteristics every sheet must set, the
/// gauges it may set, and optionally the background names allowed per type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub characteristics: Vec<String>,
    pub gauges: Vec<String>,
    /// Background type (`origin`, `background`, `role`, `tarot`) to allowed
    /// names. Empty means header values are not checked.
    pub backgrounds: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    pub fn new<C, G>(characteristics: C, gauges: G) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            characteristics: characteristics.into_iter().map(Into::into).collect(),
            gauges: gauges.into_iter().map(Into::into).collect(),
            backgrounds: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_backgrounds(mut self, backgrounds: HashMap<String, Vec<String>>) -> Self {
        self.backgrounds = backgrounds;
        self
    }

    pub fn is_characteristic(&self, name: &str) -> bool {
        self.characteristics.iter().any(|c| c == name)
    }

    pub fn is_gauge(&self, name: &str) -> bool {
        self.gauges.iter().any(|g| g == name)
    }

    pub fn checks_backgrounds(&self) -> bool {
        !self.backgrounds.is_empty()
    }
}
