// src/config/csv.rs

//! Parser for the line-oriented recipe format:
//!
//! ```text
//! Step, Dependencies, Time, Description
//! 1, , 2, Boil water
//! 2, 1, 3, Cook pasta
//! 3, 1 2, 1, Drain, then plate
//! ```
//!
//! Dependencies are separated by spaces, `;` or `|`. The description is
//! everything after the third comma.

use tracing::debug;

use crate::config::model::StepRecord;
use crate::errors::{ChefdagError, Result};
use crate::types::StepId;

/// Parse every record in `contents`.
pub fn parse_records(contents: &str) -> Result<Vec<StepRecord>> {
    let mut records = Vec::new();
    let mut seen_content = false;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !seen_content {
            seen_content = true;
            if is_header(line) {
                debug!(line = line_no, "skipping header row");
                continue;
            }
        }

        records.push(parse_line(line, line_no)?);
    }

    Ok(records)
}

fn is_header(line: &str) -> bool {
    let first = line.split(',').next().unwrap_or("").trim();
    first.eq_ignore_ascii_case("step")
}

fn parse_line(line: &str, line_no: usize) -> Result<StepRecord> {
    let fields: Vec<&str> = line.splitn(4, ',').collect();
    if fields.len() < 3 {
        return Err(ChefdagError::malformed(
            Some(line_no),
            format!("expected `id, dependencies, duration, description`, got {line:?}"),
        ));
    }

    let id = parse_id(fields[0], line_no, "step id")?;
    let dependencies = parse_dependencies(fields[1], line_no)?;
    let duration = parse_duration(fields[2], line_no)?;
    let description = fields.get(3).map(|s| s.trim()).unwrap_or("").to_string();

    Ok(StepRecord {
        id,
        dependencies,
        duration,
        description,
        line: Some(line_no),
    })
}

fn parse_id(field: &str, line_no: usize, what: &str) -> Result<StepId> {
    let field = field.trim();
    field.parse::<StepId>().map_err(|_| {
        ChefdagError::malformed(
            Some(line_no),
            format!("{what} must be a non-negative integer, got {field:?}"),
        )
    })
}

fn parse_dependencies(field: &str, line_no: usize) -> Result<Vec<StepId>> {
    field
        .split(|c: char| c.is_whitespace() || c == ';' || c == '|')
        .filter(|s| !s.is_empty())
        .map(|s| parse_id(s, line_no, "dependency id"))
        .collect()
}

fn parse_duration(field: &str, line_no: usize) -> Result<u64> {
    let field = field.trim();
    let value: i64 = field.parse().map_err(|_| {
        ChefdagError::malformed(
            Some(line_no),
            format!("duration must be an integer, got {field:?}"),
        )
    })?;

    u64::try_from(value).map_err(|_| {
        ChefdagError::malformed(Some(line_no), format!("negative duration {value}"))
    })
}
