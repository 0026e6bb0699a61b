//! # Upload Orchestrator
//! Sequences one submission end to end: normalize the image, resolve a
//! coordinate, assemble the multipart payload, ship it to the ingestion
//! service. The steps are strictly sequential — the payload cannot exist
//! until normalization and resolution both finished — and the orchestrator
//! holds no per-submission state, so a failed attempt leaks nothing into a
//! retry.

use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::image_norm::{self, DecodeError, DEFAULT_MAX_DIM};
use crate::ingest_api::{IngestClient, IngestError, ReportSubmission, UNKNOWN_LOCATION};
use crate::location::{DeviceFix, LocationResolver};
use crate::report::{Report, ReportSource};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("submit_attempts_total", "Submissions started.");
        describe_counter!("submit_success_total", "Submissions accepted by the service.");
        describe_counter!(
            "submit_failures_total",
            "Submissions that ended in a user-visible failure."
        );
    });
}

/// Raw inputs for one submission, gathered by the caller. The device fix, if
/// any, was obtained upstream via a [`DeviceLocator`]; the orchestrator never
/// requests it itself.
///
/// [`DeviceLocator`]: crate::location::DeviceLocator
#[derive(Debug, Clone)]
pub struct NewReport {
    pub image_bytes: Vec<u8>,
    pub source: ReportSource,
    pub location_text: Option<String>,
    pub device_fix: Option<DeviceFix>,
}

/// User-visible failure states of a submission. Geocoding problems never
/// appear here — the location cascade absorbs them.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The image could not be decoded. Raised before any network call;
    /// the payload is never assembled.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The service rejected the submission with a human-readable detail.
    #[error("submission rejected: {detail}")]
    Rejected { detail: String },
    /// Transport failure during upload. Retryable from scratch.
    #[error("network failure during submission")]
    Network(#[source] anyhow::Error),
}

impl SubmitError {
    /// Message suitable for direct display: server-provided detail when the
    /// failure came from the service, else a generic description.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Decode(_) => {
                "The selected file could not be read as an image. Choose a different photo."
                    .to_string()
            }
            SubmitError::Rejected { detail } => format!("Upload failed: {detail}"),
            SubmitError::Network(_) => {
                "Upload failed: the ingestion service is unreachable. Check connectivity and retry."
                    .to_string()
            }
        }
    }
}

/// Label sent with the payload: the reporter's text, or the explicit
/// "Unknown Location" sentinel when none was given.
pub fn location_label(location_text: Option<&str>) -> String {
    match location_text {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => UNKNOWN_LOCATION.to_string(),
    }
}

pub struct UploadOrchestrator {
    ingest: Arc<dyn IngestClient>,
    resolver: LocationResolver,
    max_image_dim: u32,
}

impl UploadOrchestrator {
    pub fn new(ingest: Arc<dyn IngestClient>, resolver: LocationResolver) -> Self {
        Self {
            ingest,
            resolver,
            max_image_dim: DEFAULT_MAX_DIM,
        }
    }

    pub fn with_max_image_dim(mut self, max_image_dim: u32) -> Self {
        self.max_image_dim = max_image_dim;
        self
    }

    /// Run one submission. Suspension points are awaited in order; none run
    /// concurrently for a single submission.
    pub async fn submit(&self, new_report: NewReport) -> Result<Report, SubmitError> {
        ensure_metrics_described();
        counter!("submit_attempts_total").increment(1);

        // 1) Normalize. A decode failure aborts here, before any network I/O.
        let image = image_norm::normalize_image(&new_report.image_bytes, self.max_image_dim)
            .inspect_err(|_| counter!("submit_failures_total").increment(1))?;

        // 2) Resolve. At most one network round trip; always yields a coordinate.
        let coords = self
            .resolver
            .resolve(
                new_report.device_fix.as_ref(),
                new_report.location_text.as_deref(),
            )
            .await;

        // 3) Assemble the outbound payload.
        let submission = ReportSubmission {
            image,
            source: new_report.source,
            location_label: location_label(new_report.location_text.as_deref()),
            latitude: coords.latitude,
            longitude: coords.longitude,
        };

        // 4) Upload.
        match self.ingest.upload(submission).await {
            Ok(report) => {
                counter!("submit_success_total").increment(1);
                tracing::info!(
                    report_id = report.id,
                    severity = ?report.severity,
                    priority = report.priority_score,
                    provenance = ?coords.provenance,
                    "report submitted"
                );
                Ok(report)
            }
            Err(IngestError::Rejected { detail }) => {
                counter!("submit_failures_total").increment(1);
                Err(SubmitError::Rejected { detail })
            }
            Err(IngestError::Network(e)) => {
                counter!("submit_failures_total").increment(1);
                Err(SubmitError::Network(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_text_gets_the_sentinel_label() {
        assert_eq!(location_label(None), "Unknown Location");
        assert_eq!(location_label(Some("")), "Unknown Location");
        assert_eq!(location_label(Some("   ")), "Unknown Location");
        assert_eq!(location_label(Some("Downtown Sector 4")), "Downtown Sector 4");
    }
}
