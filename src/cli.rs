use std::env;

use serde_json::json;

use crate::character::Character;
use crate::sheet::{ParseOptions, Sheet};
use crate::universe::validate::validate_universe_file;
use crate::universe::Universe;

pub const DEFAULT_UNIVERSE_PATH: &str = "data/universe.json";
pub const UNIVERSE_ENV: &str = "ADEPTUS_UNIVERSE";

const USAGE: &str = "usage: adeptus <parse|costs|fmt|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Parse,
    Costs,
    Fmt,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("parse") => Some(Command::Parse),
        Some("costs") => Some(Command::Costs),
        Some("fmt") => Some(Command::Fmt),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Parse) => handle_parse(args),
        Some(Command::Costs) => handle_costs(args),
        Some(Command::Fmt) => handle_fmt(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Universe path from `ADEPTUS_UNIVERSE`, falling back to the bundled one.
pub fn universe_path() -> String {
    env::var(UNIVERSE_ENV).unwrap_or_else(|_| DEFAULT_UNIVERSE_PATH.to_string())
}

fn load_universe() -> Result<Universe, i32> {
    let path = universe_path();
    Universe::load(&path).map_err(|err| {
        eprintln!("universe error: {err}");
        1
    })
}

fn load_sheet(command: &str, args: &[String], universe: &Universe) -> Result<Sheet, i32> {
    let Some(path) = args.get(2) else {
        eprintln!("usage: adeptus {command} <sheet>");
        return Err(2);
    };
    Sheet::load(path, &universe.vocabulary(), &ParseOptions::default()).map_err(|err| {
        eprintln!("sheet error: {err}");
        1
    })
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(err) => {
            eprintln!("serialization error: {err}");
            1
        }
    }
}

fn handle_parse(args: &[String]) -> i32 {
    let result = load_universe().and_then(|universe| load_sheet("parse", args, &universe));
    match result {
        Ok(sheet) => print_json(&sheet),
        Err(code) => code,
    }
}

fn handle_fmt(args: &[String]) -> i32 {
    let result = load_universe().and_then(|universe| load_sheet("fmt", args, &universe));
    match result {
        Ok(sheet) => {
            print!("{sheet}");
            0
        }
        Err(code) => code,
    }
}

fn handle_costs(args: &[String]) -> i32 {
    let strict = args.iter().skip(2).any(|arg| arg == "--strict");
    let universe = match load_universe() {
        Ok(universe) => universe,
        Err(code) => return code,
    };
    let sheet = match load_sheet("costs", args, &universe) {
        Ok(sheet) => sheet,
        Err(code) => return code,
    };

    let progression = match Character::progress(&sheet, &universe) {
        Ok(progression) => progression,
        Err(err) => {
            eprintln!("progression error: {err}");
            return 1;
        }
    };

    let level = if strict { "error" } else { "warning" };
    for failure in &progression.failures {
        eprintln!("{level}: {}: {}", failure.label, failure.error);
    }

    let failures: Vec<_> = progression
        .failures
        .iter()
        .map(|failure| {
            json!({
                "line": failure.line,
                "label": failure.label,
                "code": failure.error.code().as_u16(),
                "message": failure.error.to_string(),
            })
        })
        .collect();
    let payload = json!({
        "character": progression.character,
        "experience": {
            "earned": progression.character.experience.earned,
            "spent": progression.character.experience.spent,
            "remaining": progression.character.experience.remaining(),
        },
        "expenses": progression.expenses,
        "failures": failures,
    });

    let code = print_json(&payload);
    if code == 0 && strict && !progression.failures.is_empty() {
        return 1;
    }
    code
}

fn handle_validate(args: &[String]) -> i32 {
    let path = args.get(2).cloned().unwrap_or_else(universe_path);

    let report = match validate_universe_file(&path) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s), {} warning(s)",
            report.errors().count(),
            report.warnings().count()
        );
        1
    } else {
        println!(
            "validation passed: {path} ({} warning(s))",
            report.warnings().count()
        );
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn commands_dispatch_on_the_first_argument() {
        assert_eq!(parse_command(&args(&["adeptus", "parse", "x"])), Some(Command::Parse));
        assert_eq!(parse_command(&args(&["adeptus", "costs"])), Some(Command::Costs));
        assert_eq!(parse_command(&args(&["adeptus", "fmt"])), Some(Command::Fmt));
        assert_eq!(parse_command(&args(&["adeptus", "validate"])), Some(Command::Validate));
        assert_eq!(parse_command(&args(&["adeptus", "serve"])), None);
        assert_eq!(parse_command(&args(&["adeptus"])), None);
    }

    #[test]
    fn unknown_command_is_a_usage_error() {
        assert_eq!(run_with_args(&args(&["adeptus", "frobnicate"])), 2);
    }
}
