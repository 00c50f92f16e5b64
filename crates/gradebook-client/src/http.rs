//! HTTP implementation of the roster service.
//!
//! Reads are `GET` with a JSON body back; every mutation is a form-encoded
//! `POST`. Records coming back are re-derived from their marks on decode.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use gradebook_core::model::StudentRecord;
use gradebook_core::traits::RosterService;

use crate::error::ServiceError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Roster service backed by the student-record HTTP API.
pub struct HttpRosterService {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpRosterService {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            ServiceError::Network(format!(
                "student service not reachable at {}. Is the server running?",
                self.base_url
            ))
        } else {
            ServiceError::Network(e.to_string())
        }
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<reqwest::Response, ServiceError> {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        check_status(response).await
    }
}

/// Body of a failed request, when the server sends one.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    response
        .json()
        .await
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

/// `name, m1..m5` form fields for a record.
fn record_form(record: &StudentRecord) -> Vec<(&'static str, String)> {
    const MARK_FIELDS: [&str; 5] = ["m1", "m2", "m3", "m4", "m5"];

    let mut form = vec![("name", record.name().to_string())];
    form.extend(
        MARK_FIELDS
            .iter()
            .zip(record.marks())
            .map(|(field, mark)| (*field, mark.to_string())),
    );
    form
}

#[async_trait]
impl RosterService for HttpRosterService {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn list(&self) -> anyhow::Result<Vec<StudentRecord>> {
        let response = self
            .client
            .get(self.url("/students"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = check_status(response).await?;
        let records: Vec<StudentRecord> = decode(response).await?;
        tracing::debug!(count = records.len(), "fetched students");
        Ok(records)
    }

    #[instrument(skip(self, record), fields(name = record.name()))]
    async fn create(&self, record: &StudentRecord) -> anyhow::Result<StudentRecord> {
        let response = self.post_form("/students", &record_form(record)).await?;
        Ok(decode(response).await?)
    }

    #[instrument(skip(self, record))]
    async fn update(
        &self,
        student_id: &str,
        record: &StudentRecord,
    ) -> anyhow::Result<StudentRecord> {
        let mut form = vec![("studentId", student_id.to_string())];
        form.extend(record_form(record));
        let response = self.post_form("/students/update", &form).await?;
        Ok(decode(response).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, student_id: &str) -> anyhow::Result<()> {
        self.post_form("/students/delete", &[("studentId", student_id.to_string())])
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> anyhow::Result<()> {
        self.post_form("/students/clear", &[]).await?;
        Ok(())
    }
}
