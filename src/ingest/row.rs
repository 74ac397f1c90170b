//! Curriculum table row parsing
//!
//! Turns the cell texts of one table row into cleaned scalar fields. The
//! source table is hand-maintained, so every field is checked and a bad row
//! is reported as a value instead of aborting the whole course.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const OPT_MARKER: &str = "(OPT)";
const OBR_MARKER: &str = "(OBR)";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RowError {
    #[error("Row has {0} non-empty cells, expected at least 3")]
    MalformedRow(usize),

    #[error("Invalid credit hours: '{0}'")]
    InvalidHours(String),

    #[error("Invalid unit name: '{0}'")]
    InvalidName(String),

    #[error("Cannot tell whether unit is optional: '{0}'")]
    InvalidOptionalFlag(String),

    #[error("Duplicate unit name: {0}")]
    DuplicateUnitName(String),
}

/// How the optional flag is read from the name cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalRule {
    /// Optional iff the cell carries `(OPT)`
    #[default]
    OptMarker,
    /// Optional iff the cell does not carry `(OBR)`
    ObrMarker,
    /// Exactly one of `(OPT)` / `(OBR)` must be present
    Strict,
}

impl OptionalRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalRule::OptMarker => "opt_marker",
            OptionalRule::ObrMarker => "obr_marker",
            OptionalRule::Strict => "strict",
        }
    }

    /// Reads the optional flag from a raw (uncleaned) name cell
    pub fn is_optional(&self, raw_name: &str) -> Result<bool, RowError> {
        let opt = raw_name.contains(OPT_MARKER);
        let obr = raw_name.contains(OBR_MARKER);

        match (self, opt, obr) {
            (_, true, true) => Err(RowError::InvalidOptionalFlag(raw_name.trim().to_string())),
            (OptionalRule::Strict, false, false) => {
                Err(RowError::InvalidOptionalFlag(raw_name.trim().to_string()))
            }
            (OptionalRule::ObrMarker, _, obr) => Ok(!obr),
            (_, opt, _) => Ok(opt),
        }
    }
}

/// Knobs for reading the curriculum table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Rule for the optional/required flag
    pub optional_rule: OptionalRule,

    /// Prerequisite cell value meaning "no prerequisite"
    pub none_literal: String,

    /// Unit suffix trailing the credit hours
    pub hours_suffix: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            optional_rule: OptionalRule::OptMarker,
            none_literal: "Nenhum".to_string(),
            hours_suffix: "h".to_string(),
        }
    }
}

/// Cleaned fields of one table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub name: String,
    pub credit_hours: u32,
    pub prerequisite: Option<String>,
    pub optional: bool,
}

/// Parses one table row of `[name, hours, prerequisite, ...]` cells
pub fn parse_row<S: AsRef<str>>(cells: &[S], options: &ParseOptions) -> Result<ParsedRow, RowError> {
    let filled = cells.iter().filter(|c| !c.as_ref().trim().is_empty()).count();
    if filled < 3 || cells.len() < 3 {
        return Err(RowError::MalformedRow(filled));
    }

    let raw_name = cells[0].as_ref();
    let name = clean_name(raw_name);
    if name.is_empty() {
        return Err(RowError::InvalidName(raw_name.trim().to_string()));
    }

    let credit_hours = clean_hours(cells[1].as_ref(), &options.hours_suffix)?;
    let optional = options.optional_rule.is_optional(raw_name)?;

    let prerequisite = clean_name(cells[2].as_ref());
    let prerequisite = if prerequisite.is_empty() || prerequisite == options.none_literal {
        None
    } else {
        Some(prerequisite)
    };

    Ok(ParsedRow {
        name,
        credit_hours,
        prerequisite,
        optional,
    })
}

/// Collapses whitespace, drops the `(OPT)`/`(OBR)` markers and trailing periods
pub fn clean_name(raw: &str) -> String {
    let without_markers = raw.replace(OPT_MARKER, " ").replace(OBR_MARKER, " ");
    let collapsed = collapse_whitespace(&without_markers);
    collapse_whitespace(collapsed.trim_end_matches(|c: char| c == '.' || c.is_whitespace()))
}

/// Parses `"60h"` style credit hours into a positive integer
pub fn clean_hours(raw: &str, suffix: &str) -> Result<u32, RowError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix(suffix).unwrap_or(trimmed).trim();

    // `u32::from_str` would take a leading `+`
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RowError::InvalidHours(trimmed.to_string()));
    }

    match digits.parse::<u32>() {
        Ok(hours) if hours > 0 => Ok(hours),
        _ => Err(RowError::InvalidHours(trimmed.to_string())),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
