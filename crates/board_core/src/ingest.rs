//! Turns raw spreadsheet rows into the weekday-keyed board document.
//!
//! A row reads like `ACME 1234 8/21/2025 8/25/2025 Thursday`: free text,
//! up to two `M/D/YYYY` dates, and the weekday it is filed under.

use std::sync::OnceLock;

use regex::Regex;
use shared::domain::{RecordDocument, ShipmentRecord};
use tracing::{info, warn};

/// Day keys in the order the sheet export writes them.
pub const EXPORT_DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const DEPARTURE_TBD: &str = "TBD";

fn trailing_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)\b({})\b\s*$", EXPORT_DAY_ORDER.join("|"));
        Regex::new(&pattern).expect("weekday pattern is valid")
    })
}

fn sheet_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").expect("date pattern is valid"))
}

fn tbd_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bTBD\b").expect("tbd pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// Capitalized, e.g. `Thursday`.
    pub day: String,
    pub record: ShipmentRecord,
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Joins the non-empty cells of a row with single spaces.
pub fn join_cells<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|cell| cell.as_ref())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parses one joined row. `None` means the row carries no trailing weekday.
pub fn parse_row(line: &str) -> Option<ParsedRow> {
    let line = line.trim();
    let day_match = trailing_day_regex().captures(line)?;
    let day = capitalize(day_match.get(1)?.as_str());
    let content = line[..day_match.get(0)?.start()].trim();

    let dates: Vec<&str> = sheet_date_regex()
        .find_iter(content)
        .map(|m| m.as_str())
        .collect();
    let arrival = dates.first().map(|d| d.to_string());
    let departure = match dates.get(1) {
        Some(d) => Some(d.to_string()),
        None if content.to_ascii_uppercase().contains(DEPARTURE_TBD) => {
            Some(DEPARTURE_TBD.to_string())
        }
        None => None,
    };

    let mut customer = content.to_string();
    for date in &dates {
        customer = customer.replace(date, "");
    }
    let customer = tbd_regex().replace_all(&customer, "");
    let customer = whitespace_regex().replace_all(&customer, " ");
    let customer = customer.trim_matches(|c: char| c == ' ' || c == '-').to_string();

    Some(ParsedRow {
        day,
        record: ShipmentRecord {
            customer,
            arrival,
            departure,
            ..Default::default()
        },
    })
}

/// Groups sheet rows under their weekday. Every day key is present, even when empty.
pub fn group_rows_by_day(rows: &[Vec<String>]) -> RecordDocument {
    let mut days: Vec<(String, Vec<ShipmentRecord>)> = EXPORT_DAY_ORDER
        .iter()
        .map(|day| (day.to_string(), Vec::new()))
        .collect();

    let mut accepted = 0usize;
    for (index, cells) in rows.iter().enumerate() {
        let line = join_cells(cells);
        if line.is_empty() {
            continue;
        }
        let Some(parsed) = parse_row(&line) else {
            warn!(row = index + 1, content = %line, "no weekday at end of row; skipping");
            continue;
        };
        if let Some((_, records)) = days.iter_mut().find(|(day, _)| *day == parsed.day) {
            records.push(parsed.record);
            accepted += 1;
        }
    }

    info!(rows = rows.len(), accepted, "grouped sheet rows by day");
    RecordDocument::ByWeekday(days)
}

/// Splits a tab-separated sheet export into rows of cells.
pub fn split_tsv(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

#[cfg(test)]
#[path = "tests/ingest_tests.rs"]
mod tests;
