//! Where the board document comes from.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::RecordDocument, error::BoardError};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human readable location, used in diagnostics.
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<RecordDocument, BoardError>;
}

pub struct HttpRecordSource {
    http: Client,
    url: String,
}

impl HttpRecordSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<RecordDocument, BoardError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|err| BoardError::retrieval(&self.url, format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::retrieval(
                &self.url,
                format!("server responded with {status}"),
            ));
        }

        let document = response
            .json::<RecordDocument>()
            .await
            .map_err(|err| BoardError::retrieval(&self.url, format!("invalid document: {err}")))?;
        debug!(source = %self.url, records = document.record_count(), "fetched board document");
        Ok(document)
    }
}

pub struct FileRecordSource {
    path: PathBuf,
    name: String,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<RecordDocument, BoardError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| BoardError::retrieval(&self.name, format!("read failed: {err}")))?;
        let document = serde_json::from_str::<RecordDocument>(&raw)
            .map_err(|err| BoardError::retrieval(&self.name, format!("invalid document: {err}")))?;
        debug!(source = %self.name, records = document.record_count(), "read board document");
        Ok(document)
    }
}

/// `http(s)://` locations are fetched over the network, anything else is a file path.
pub fn source_from_location(location: &str) -> Box<dyn RecordSource> {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Box::new(HttpRecordSource::new(url.to_string()))
        }
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Box::new(FileRecordSource::new(path)),
            Err(()) => Box::new(FileRecordSource::new(location)),
        },
        _ => Box::new(FileRecordSource::new(location)),
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
