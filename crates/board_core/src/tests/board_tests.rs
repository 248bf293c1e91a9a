use super::*;
use async_trait::async_trait;
use chrono::Utc;
use shared::{domain::ShipmentRecord, error::ErrorCode};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::classifier::BucketKind;

struct StaticSource {
    document: Option<RecordDocument>,
    fetches: Arc<AtomicUsize>,
}

impl StaticSource {
    fn ok(document: RecordDocument) -> Self {
        Self {
            document: Some(document),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            document: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<RecordDocument, BoardError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.document
            .clone()
            .ok_or_else(|| BoardError::retrieval("static", "server responded with 500"))
    }
}

#[derive(Default)]
struct RecordingTarget {
    boards: Vec<BoardSnapshot>,
    notices: Vec<ErrorNotice>,
}

impl RenderTarget for RecordingTarget {
    fn show_board(&mut self, snapshot: &BoardSnapshot) {
        self.boards.push(snapshot.clone());
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        self.notices.push(notice.clone());
    }
}

fn record(customer: &str, arrival: Option<&str>) -> ShipmentRecord {
    ShipmentRecord {
        customer: customer.to_string(),
        arrival: arrival.map(str::to_string),
        ..Default::default()
    }
}

fn june_10_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
        .single()
        .expect("instant")
}

fn weekday_document() -> RecordDocument {
    RecordDocument::ByWeekday(vec![
        (
            "Tuesday".to_string(),
            vec![record("tue", Some("2024-06-11"))],
        ),
        (
            "Monday".to_string(),
            vec![
                record("mon", Some("2024-06-10")),
                record("unscheduled", None),
            ],
        ),
    ])
}

#[tokio::test]
async fn successful_cycle_renders_classified_snapshot() {
    let source = StaticSource::ok(weekday_document());
    let mut target = RecordingTarget::default();

    let snapshot = load_cycle(&source, Some(&mut target), &june_10_noon())
        .await
        .expect("load");

    assert_eq!(target.boards.len(), 1);
    assert!(target.notices.is_empty());
    assert_eq!(snapshot.today, NaiveDate::from_ymd_opt(2024, 6, 10).expect("date"));
    assert_eq!(
        snapshot.classification.bucket(BucketKind::Today).members[0].customer,
        "mon"
    );
    assert_eq!(snapshot.classification.excluded, 1);

    let grid: Vec<(Weekday, &str)> = snapshot
        .grid_rows
        .iter()
        .map(|row| (row.weekday, row.record.customer.as_str()))
        .collect();
    assert_eq!(
        grid,
        vec![
            (Weekday::Monday, "mon"),
            (Weekday::Monday, "unscheduled"),
            (Weekday::Tuesday, "tue"),
        ]
    );
}

#[tokio::test]
async fn flat_documents_place_grid_rows_by_effective_weekday() {
    let source = StaticSource::ok(RecordDocument::Flat(vec![
        record("wed", Some("2024-06-12")),
        record("sun", Some("2024-06-09")),
        record("none", None),
    ]));
    let mut target = RecordingTarget::default();

    let snapshot = load_cycle(&source, Some(&mut target), &june_10_noon())
        .await
        .expect("load");

    let grid: Vec<&str> = snapshot
        .grid_rows
        .iter()
        .map(|row| row.record.customer.as_str())
        .collect();
    assert_eq!(grid, vec!["sun", "wed"]);
}

#[tokio::test]
async fn retrieval_failure_shows_inline_notice_without_partial_render() {
    let source = StaticSource::failing();
    let mut target = RecordingTarget::default();

    let err = load_cycle(&source, Some(&mut target), &june_10_noon())
        .await
        .expect_err("should fail");

    assert_eq!(err.code(), ErrorCode::RetrievalFailure);
    assert!(target.boards.is_empty());
    assert_eq!(target.notices.len(), 1);
    assert_eq!(target.notices[0].code, ErrorCode::RetrievalFailure);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1, "no retry");
}

#[tokio::test]
async fn missing_target_aborts_before_fetching() {
    let source = StaticSource::ok(weekday_document());

    let err = load_cycle(&source, None, &june_10_noon())
        .await
        .expect_err("should fail");

    assert!(matches!(err, BoardError::MissingRenderTarget { .. }));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
}
