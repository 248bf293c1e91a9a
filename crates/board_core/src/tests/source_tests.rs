use super::*;
use axum::{http::StatusCode, routing::get, Router};
use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;

const WEEKDAY_DOCUMENT: &str = r#"{
    "Monday": [{"customer": "ACME", "reference": "R-1", "arrival": "2024-06-10"}],
    "Tuesday": [{"customer": "Globex", "departure": "2024-06-11", "type": "N/A"}]
}"#;

async fn spawn_document_server() -> anyhow::Result<String> {
    env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/shipments.json", get(|| async { WEEKDAY_DOCUMENT }))
        .route(
            "/broken.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        )
        .route("/garbage.json", get(|| async { "not json" }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn temp_path(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("board_core_{label}_{suffix}.json"))
}

#[tokio::test]
async fn http_source_parses_weekday_document() {
    let base = spawn_document_server().await.expect("spawn server");
    let source = HttpRecordSource::new(format!("{base}/shipments.json"));

    let document = source.fetch().await.expect("fetch");

    assert_eq!(document.record_count(), 2);
    let records = document.flatten();
    assert_eq!(records[0].customer, "ACME");
    assert_eq!(records[1].display_type(), None);
}

#[tokio::test]
async fn non_success_status_is_a_retrieval_failure() {
    let base = spawn_document_server().await.expect("spawn server");
    let source = HttpRecordSource::new(format!("{base}/broken.json"));

    let err = source.fetch().await.expect_err("should fail");

    assert!(matches!(err, BoardError::Retrieval { .. }));
    assert!(err.to_string().contains("503"), "unexpected error: {err}");
}

#[tokio::test]
async fn undecodable_body_is_a_retrieval_failure() {
    let base = spawn_document_server().await.expect("spawn server");
    let source = HttpRecordSource::new(format!("{base}/garbage.json"));

    let err = source.fetch().await.expect_err("should fail");
    assert!(err.to_string().contains("invalid document"));
}

#[tokio::test]
async fn unreachable_host_is_a_retrieval_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source = HttpRecordSource::new(format!("http://{addr}/shipments.json"));
    let err = source.fetch().await.expect_err("should fail");
    assert!(matches!(err, BoardError::Retrieval { .. }));
}

#[tokio::test]
async fn file_source_reads_flat_document() {
    let path = temp_path("flat");
    fs::write(&path, r#"[{"customer": "Initech", "arrival": "8/21/2025"}]"#).expect("write");

    let document = FileRecordSource::new(&path).fetch().await.expect("fetch");
    assert!(matches!(document, RecordDocument::Flat(ref records) if records.len() == 1));

    fs::remove_file(path).expect("cleanup");
}

#[tokio::test]
async fn missing_file_is_a_retrieval_failure() {
    let err = FileRecordSource::new(temp_path("missing"))
        .fetch()
        .await
        .expect_err("should fail");
    assert_eq!(err.code(), shared::error::ErrorCode::RetrievalFailure);
}

#[test]
fn location_scheme_selects_the_source_kind() {
    assert_eq!(
        source_from_location("https://example.com/data.json").name(),
        "https://example.com/data.json"
    );
    assert_eq!(
        source_from_location("data/shipments_by_day.json").name(),
        "data/shipments_by_day.json"
    );
}
