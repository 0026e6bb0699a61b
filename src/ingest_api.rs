//! # Ingestion Service Client
//! Thin client for the external report ingestion/listing API. The service
//! owns persistence and all damage classification; this crate only ships
//! multipart submissions to it and reads the unordered report feed back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::image_norm::NormalizedImage;
use crate::report::{Report, ReportSource};

/// Sentinel label used when the reporter gave no location text.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Fully assembled outbound payload for one submission. Built only after
/// normalization and location resolution both succeeded, and consumed by the
/// upload; a failed submission leaves nothing behind.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSubmission {
    pub image: NormalizedImage,
    pub source: ReportSource,
    pub location_label: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// The service refused the submission (validation or server error).
    /// `detail` is the human-readable message it returned.
    #[error("submission rejected: {detail}")]
    Rejected { detail: String },
    /// Transport failure before a server verdict was received.
    #[error("ingestion service unreachable")]
    Network(#[source] anyhow::Error),
}

/// Seam to the external ingestion endpoints. Mocked in tests; the HTTP
/// implementation below is the production path.
#[async_trait]
pub trait IngestClient: Send + Sync {
    /// POST one multipart submission; returns the created, classified report.
    async fn upload(&self, submission: ReportSubmission) -> Result<Report, IngestError>;

    /// GET the current report feed. Order is unspecified by the server;
    /// callers impose their own.
    async fn list_reports(&self) -> Result<Vec<Report>, IngestError>;
}

pub struct HttpIngestClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIngestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("fieldlink/0.1 (disaster field reporting client)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

/// Error body shape of the ingestion service (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[async_trait]
impl IngestClient for HttpIngestClient {
    async fn upload(&self, submission: ReportSubmission) -> Result<Report, IngestError> {
        let form = Form::new()
            .part(
                "file",
                Part::bytes(submission.image.bytes)
                    .file_name("report.jpg")
                    .mime_str("image/jpeg")
                    .map_err(|e| IngestError::Network(e.into()))?,
            )
            .text("source", submission.source.as_str())
            .text("location", submission.location_label)
            .text("latitude", submission.latitude.to_string())
            .text("longitude", submission.longitude.to_string());

        let resp = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| IngestError::Network(e.into()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| format!("server returned {status}"));
            return Err(IngestError::Rejected { detail });
        }

        resp.json::<Report>()
            .await
            .map_err(|e| IngestError::Network(e.into()))
    }

    async fn list_reports(&self) -> Result<Vec<Report>, IngestError> {
        self.http
            .get(format!("{}/reports", self.base_url))
            .send()
            .await
            .map_err(|e| IngestError::Network(e.into()))?
            .error_for_status()
            .map_err(|e| IngestError::Network(e.into()))?
            .json::<Vec<Report>>()
            .await
            .map_err(|e| IngestError::Network(e.into()))
    }
}
