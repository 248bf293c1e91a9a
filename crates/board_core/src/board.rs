//! One load cycle: fetch, classify, hand the result to the render target.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use shared::{
    domain::{GridRow, RecordDocument, Weekday},
    error::{BoardError, ErrorNotice},
};
use tracing::{error, info};

use crate::{
    classifier::{classify_with_tz, parse_calendar_date, Classification},
    source::RecordSource,
};

/// Everything a view needs to draw one refresh of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub loaded_at: DateTime<Local>,
    pub today: NaiveDate,
    pub classification: Classification,
    pub grid_rows: Vec<GridRow>,
}

impl BoardSnapshot {
    pub fn build<Tz: TimeZone>(document: &RecordDocument, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let records = document.flatten();
        let classification = classify_with_tz(today, &tz, &records);
        let grid_rows = document.weekly_rows(|record| {
            record
                .effective_date_raw()
                .and_then(|raw| parse_calendar_date(raw, &tz))
                .map(|date| Weekday::from(date.weekday()))
        });

        Self {
            loaded_at: now.with_timezone(&Local),
            today,
            classification,
            grid_rows,
        }
    }
}

/// The surface a load cycle draws into.
pub trait RenderTarget: Send {
    fn show_board(&mut self, snapshot: &BoardSnapshot);
    /// Replaces whatever is shown with an inline error notice.
    fn show_error(&mut self, notice: &ErrorNotice);
}

/// Runs a single load cycle against an injected clock value.
///
/// A missing target aborts before fetching and only logs. A failed fetch
/// replaces the target's content with an error notice; nothing is retried
/// and nothing is partially rendered.
pub async fn load_cycle<Tz: TimeZone>(
    source: &dyn RecordSource,
    target: Option<&mut dyn RenderTarget>,
    now: &DateTime<Tz>,
) -> Result<BoardSnapshot, BoardError> {
    let Some(target) = target else {
        let err = BoardError::MissingRenderTarget {
            target: "board".to_string(),
        };
        error!(source = source.name(), "{err}; aborting load");
        return Err(err);
    };

    let document = match source.fetch().await {
        Ok(document) => document,
        Err(err) => {
            error!(source = source.name(), "{err}");
            target.show_error(&ErrorNotice::from(&err));
            return Err(err);
        }
    };

    let snapshot = BoardSnapshot::build(&document, now);
    info!(
        source = source.name(),
        today = %snapshot.today,
        scheduled = snapshot.classification.scheduled_count(),
        grid_rows = snapshot.grid_rows.len(),
        "board loaded"
    );
    target.show_board(&snapshot);
    Ok(snapshot)
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
