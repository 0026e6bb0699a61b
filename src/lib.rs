// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod image_norm;
pub mod ingest_api;
pub mod location;
pub mod ranking;
pub mod report;
pub mod status;
pub mod submit;

// ---- Re-exports for stable public API ----
pub use crate::image_norm::{normalize_image, DecodeError, NormalizedImage, DEFAULT_MAX_DIM};
pub use crate::ingest_api::{HttpIngestClient, IngestClient, IngestError, ReportSubmission};
pub use crate::location::{
    DeviceFix, DeviceLocationError, DeviceLocator, GeocodeClient, GeocodeHit, LocationCandidate,
    LocationResolver, NominatimClient, Provenance,
};
pub use crate::ranking::{
    critical_zones, RankedWindow, DEFAULT_PRIORITY_THRESHOLD, DEFAULT_WINDOW_SIZE,
};
pub use crate::report::{Report, ReportSource, Severity};
pub use crate::status::{StatusTicker, DEFAULT_ROTATION_PERIOD};
pub use crate::submit::{NewReport, SubmitError, UploadOrchestrator};
