use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::LoadError;
use crate::universe::{Aptitude, Universe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// The entry breaks lookup or pricing outright.
    Error,
    /// The entry loads but some labels will never resolve or price.
    Warning,
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// One finding, located by a `section[index]` or `section 'name'` context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.record(ValidationSeverity::Error, context.into(), message.into());
    }

    fn warning(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.record(ValidationSeverity::Warning, context.into(), message.into());
    }

    fn record(&mut self, severity: ValidationSeverity, context: String, message: String) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context,
            message,
        });
    }

    fn with_severity(&self, severity: ValidationSeverity) -> impl Iterator<Item = &ValidationDiagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> + '_ {
        self.with_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> + '_ {
        self.with_severity(ValidationSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Load a universe file and check it.
pub fn validate_universe_file(path: impl AsRef<Path>) -> Result<ValidationReport, LoadError> {
    let universe = Universe::load(path)?;
    Ok(validate_universe(&universe))
}

/// Check a universe for entries that would never resolve or never price.
pub fn validate_universe(universe: &Universe) -> ValidationReport {
    let mut report = ValidationReport::default();

    let characteristics: Vec<&str> = universe.characteristics.iter().map(|c| c.name.as_str()).collect();
    let skills: Vec<&str> = universe.skills.iter().map(|s| s.name.as_str()).collect();
    let talents: Vec<&str> = universe.talents.iter().map(|t| t.name.as_str()).collect();
    let aptitudes: Vec<&str> = universe.aptitudes.iter().map(Aptitude::as_str).collect();
    let gauges: Vec<&str> = universe.gauges.iter().map(|g| g.name.as_str()).collect();

    check_names(&mut report, "characteristics", &characteristics, Some(' '));
    check_names(&mut report, "skills", &skills, Some(':'));
    check_names(&mut report, "talents", &talents, Some(':'));
    check_names(&mut report, "aptitudes", &aptitudes, None);
    check_names(&mut report, "gauges", &gauges, Some(' '));
    for (kind, entries) in &universe.backgrounds {
        let names: Vec<&str> = entries.iter().map(|b| b.name.as_str()).collect();
        check_names(&mut report, &format!("backgrounds.{kind}"), &names, None);
    }

    check_shadowing(&mut report, &[
        ("characteristics", &characteristics),
        ("skills", &skills),
        ("talents", &talents),
        ("aptitudes", &aptitudes),
        ("gauges", &gauges),
    ]);

    if !universe.aptitudes.is_empty() {
        let known: HashSet<&str> = aptitudes.iter().copied().collect();
        let references = universe
            .characteristics
            .iter()
            .map(|c| ("characteristics", &c.name, &c.aptitudes))
            .chain(universe.skills.iter().map(|s| ("skills", &s.name, &s.aptitudes)))
            .chain(universe.talents.iter().map(|t| ("talents", &t.name, &t.aptitudes)))
            .chain(universe.gauges.iter().map(|g| ("gauges", &g.name, &g.aptitudes)))
            .chain(
                universe
                    .backgrounds
                    .values()
                    .flatten()
                    .map(|b| ("backgrounds", &b.name, &b.aptitudes)),
            );
        for (section, name, refs) in references {
            for aptitude in refs {
                if !known.contains(aptitude.as_str()) {
                    report.warning(
                        format!("{section} '{name}'.aptitudes"),
                        format!("unknown aptitude '{aptitude}'"),
                    );
                }
            }
        }
    }

    for (kind, present) in [
        ("characteristic", !universe.characteristics.is_empty()),
        ("skill", !universe.skills.is_empty()),
        ("talent", !universe.talents.is_empty()),
    ] {
        if present && !universe.costs.has_kind(kind) {
            report.warning(
                "costs",
                format!("no '{kind}' costs; those upgrades need a literal cost"),
            );
        }
    }

    for talent in &universe.talents {
        for requirement in &talent.requirements {
            if universe.find_coster(requirement).is_none() {
                report.warning(
                    format!("talents '{}'.requirements", talent.name),
                    format!("requirement '{requirement}' names nothing in the universe"),
                );
            }
        }
    }

    if universe.costs.has_kind("talent") {
        for talent in &universe.talents {
            let max_matches = u32::try_from(talent.aptitudes.len()).unwrap_or(u32::MAX);
            for matches in 0..=max_matches {
                if universe.costs.price("talent", matches, talent.tier).is_err() {
                    report.warning(
                        format!("talents '{}'", talent.name),
                        format!(
                            "no cost for tier {} with {matches} matching aptitude(s)",
                            talent.tier
                        ),
                    );
                }
            }
        }
    }

    tracing::debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated universe"
    );
    report
}

fn check_names(report: &mut ValidationReport, section: &str, names: &[&str], separator: Option<char>) {
    let mut seen = HashSet::new();
    for (index, name) in names.iter().enumerate() {
        let context = format!("{section}[{index}]");
        if name.trim().is_empty() {
            report.error(context, "missing non-empty 'name'");
            continue;
        }
        if !seen.insert(*name) {
            report.error(context.clone(), format!("duplicate name '{name}'"));
        }
        if let Some(separator) = separator.filter(|sep| name.contains(*sep)) {
            report.error(
                context,
                format!("name '{name}' contains {separator:?} and can never match an upgrade label"),
            );
        }
    }
}

/// Lookup goes characteristics, skills, talents, aptitudes, gauges: a name
/// repeated in a later section is unreachable from a label.
fn check_shadowing(report: &mut ValidationReport, sections: &[(&str, &Vec<&str>)]) {
    for (position, (section, names)) in sections.iter().enumerate() {
        for name in names.iter() {
            let earlier = sections[..position]
                .iter()
                .find(|(_, other)| other.contains(name));
            if let Some((winner, _)) = earlier {
                report.warning(
                    format!("{section} '{name}'"),
                    format!("shadowed by {winner} of the same name"),
                );
            }
        }
    }
}
