//! Canonical text form of a sheet, readable back by the parser.

use std::fmt;

use chrono::Datelike;

use crate::sheet::header::{Header, HEADER_KEYS};
use crate::sheet::parser::Sheet;
use crate::sheet::session::Session;
use crate::sheet::upgrade::Upgrade;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in HEADER_KEYS {
            if let Some(value) = self.get(key) {
                writeln!(f, "{key}: {value}")?;
            }
        }
        for (key, value) in &self.extra {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mark, self.label())?;
        if let Some(cost) = self.cost {
            write!(f, " [{cost}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}/{:02}/{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        if let Some(reward) = self.reward {
            write!(f, " [{reward}]")?;
        }
        writeln!(f)?;
        for upgrade in &self.upgrades {
            writeln!(f, "\t{upgrade}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f)?;
        for (name, value) in &self.characteristics {
            writeln!(f, "{name} {value}")?;
        }
        for gauge in &self.gauges {
            writeln!(f, "{} {}", gauge.name, gauge.value)?;
        }
        for session in &self.sessions {
            writeln!(f)?;
            write!(f, "{session}")?;
        }
        Ok(())
    }
}
