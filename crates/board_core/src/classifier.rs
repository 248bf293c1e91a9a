//! Assigns shipment records to nine "today"-relative buckets.
//!
//! Classification works on calendar days only: time-of-day is discarded on
//! both the reference instant and every record date, so two records on the
//! same day always share a bucket.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone};
use shared::domain::{ShipmentRecord, Weekday};

pub const BUCKET_COUNT: usize = 9;
/// Days ahead of today that still get their own bucket.
pub const MAX_DAYS_AHEAD: i64 = 6;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a record date string down to its calendar day in `tz`.
///
/// Offset-carrying instants are converted into `tz` first; naive values are
/// taken as already local. Returns `None` for placeholders such as `TBD`.
pub fn parse_calendar_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(tz).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    Overdue,
    Today,
    /// 1 to 6 days after today.
    DaysAhead(u8),
    Future,
}

impl BucketKind {
    pub fn from_day_offset(diff_days: i64) -> Self {
        match diff_days {
            d if d < 0 => BucketKind::Overdue,
            0 => BucketKind::Today,
            d if d <= MAX_DAYS_AHEAD => BucketKind::DaysAhead(d as u8),
            _ => BucketKind::Future,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        match ordinal {
            0 => Some(BucketKind::Overdue),
            1 => Some(BucketKind::Today),
            2..=7 => Some(BucketKind::DaysAhead((ordinal - 1) as u8)),
            8 => Some(BucketKind::Future),
            _ => None,
        }
    }

    pub fn ordinal(self) -> usize {
        match self {
            BucketKind::Overdue => 0,
            BucketKind::Today => 1,
            // Out-of-range offsets fold into Today or Future.
            BucketKind::DaysAhead(d) => usize::from(d).min(MAX_DAYS_AHEAD as usize + 1) + 1,
            BucketKind::Future => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub ordinal: usize,
    pub kind: BucketKind,
    /// `today + (ordinal - 1)`: the last overdue day, today, each day ahead,
    /// or the first future day.
    pub anchor: NaiveDate,
    pub title: String,
    pub members: Vec<ShipmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub today: NaiveDate,
    pub buckets: Vec<Bucket>,
    /// Records left out because they have no usable date.
    pub excluded: usize,
}

impl Classification {
    pub fn bucket(&self, kind: BucketKind) -> &Bucket {
        &self.buckets[kind.ordinal()]
    }

    pub fn scheduled_count(&self) -> usize {
        self.buckets.iter().map(|b| b.members.len()).sum()
    }
}

/// `MM/DD(Ddd)`
pub fn format_day_label(date: NaiveDate) -> String {
    format!(
        "{:02}/{:02}({})",
        date.month(),
        date.day(),
        Weekday::from(date.weekday()).abbrev()
    )
}

pub fn bucket_title(kind: BucketKind, anchor: NaiveDate) -> String {
    let label = format_day_label(anchor);
    match kind {
        BucketKind::Overdue => format!("~{label}"),
        BucketKind::Today => format!("Today {label}"),
        BucketKind::DaysAhead(_) => label,
        BucketKind::Future => format!("{label}~"),
    }
}

fn anchor_for(today: NaiveDate, ordinal: usize) -> NaiveDate {
    if ordinal == 0 {
        today.pred_opt().unwrap_or(today)
    } else {
        today
            .checked_add_days(Days::new(ordinal as u64 - 1))
            .unwrap_or(today)
    }
}

fn empty_buckets(today: NaiveDate) -> Vec<Bucket> {
    (0..BUCKET_COUNT)
        .filter_map(|ordinal| BucketKind::from_ordinal(ordinal).map(|kind| (ordinal, kind)))
        .map(|(ordinal, kind)| {
            let anchor = anchor_for(today, ordinal);
            Bucket {
                ordinal,
                kind,
                anchor,
                title: bucket_title(kind, anchor),
                members: Vec::new(),
            }
        })
        .collect()
}

/// Stable partition of `records` into the nine buckets relative to `today`.
pub fn classify_with_tz<Tz: TimeZone>(
    today: NaiveDate,
    tz: &Tz,
    records: &[ShipmentRecord],
) -> Classification {
    let mut buckets = empty_buckets(today);
    let mut excluded = 0;

    for record in records {
        let Some(date) = record
            .effective_date_raw()
            .and_then(|raw| parse_calendar_date(raw, tz))
        else {
            excluded += 1;
            continue;
        };
        let diff_days = date.signed_duration_since(today).num_days();
        let kind = BucketKind::from_day_offset(diff_days);
        buckets[kind.ordinal()].members.push(record.clone());
    }

    Classification {
        today,
        buckets,
        excluded,
    }
}

/// Classifies with RFC 3339 instants converted to the system's local zone.
pub fn classify(today: NaiveDate, records: &[ShipmentRecord]) -> Classification {
    classify_with_tz(today, &chrono::Local, records)
}

/// Classifies against an injected clock value, normalized to its own calendar day.
pub fn classify_at<Tz: TimeZone>(now: &DateTime<Tz>, records: &[ShipmentRecord]) -> Classification {
    classify_with_tz(now.date_naive(), &now.timezone(), records)
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
