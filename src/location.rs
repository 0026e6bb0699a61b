//! # Location Resolver
//! Produces exactly one coordinate for a new report via a trust-ordered
//! cascade: device fix → one forward-geocoding lookup → synthesized
//! placeholder. Every submission leaves with a coordinate; which step fired
//! is recorded as provenance so callers can tell a verified position from a
//! fabricated one.
//!
//! The resolver performs at most one network round trip total. Geocoding
//! failures are absorbed by the cascade (logged, counted), never surfaced.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Fixed reference point for the synthesized fallback.
pub const REFERENCE_POINT: (f64, f64) = (34.05, -118.25);

/// Maximum pseudo-random offset applied per axis by the synthesized step.
pub const JITTER_DEGREES: f64 = 0.1;

/// One-time metrics registration (so series show up even before first use).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "location_geocode_unavailable_total",
            "Forward-geocoding lookups that failed or returned no candidate."
        );
        describe_counter!(
            "location_synthesized_total",
            "Resolutions that fell through to the synthesized placeholder."
        );
    });
}

/// Which cascade step produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Precise device-reported fix, used verbatim. Highest trust.
    Device,
    /// First candidate of a single forward-geocoding lookup.
    Geocoded,
    /// Placeholder jittered around [`REFERENCE_POINT`]; never to be
    /// presented as a verified location.
    Synthesized,
}

/// Best-effort coordinate for one submission. Transient: created and
/// consumed within a single submission, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub provenance: Provenance,
}

/// Device-reported coordinate obtained by the caller before submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceLocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("device location unavailable")]
    Unavailable,
}

/// Injected capability for device geolocation. The resolver never calls
/// this itself — the caller requests a fix up front and passes the result
/// in, falling back to manual text entry when it fails. Neither failure
/// variant is fatal to a submission.
pub trait DeviceLocator: Send + Sync {
    fn current_fix(&self) -> Result<DeviceFix, DeviceLocationError>;
}

/// One forward-geocoding candidate. Lat/lon arrive as strings on the wire.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
}

/// Forward-geocoding seam: free text in, zero or more candidates out.
#[async_trait]
pub trait GeocodeClient: Send + Sync {
    async fn forward(&self, query: &str) -> anyhow::Result<Vec<GeocodeHit>>;
    fn name(&self) -> &'static str;
}

/// Nominatim-style forward geocoder over HTTP.
pub struct NominatimClient {
    http: reqwest::Client,
    search_url: String,
}

impl NominatimClient {
    pub fn new(search_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("fieldlink/0.1 (disaster field reporting client)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl GeocodeClient for NominatimClient {
    async fn forward(&self, query: &str) -> anyhow::Result<Vec<GeocodeHit>> {
        let hits = self
            .http
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<GeocodeHit>>()
            .await?;
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

/// Tagged step result. Each cascade step either resolves or declines;
/// the resolver runs steps in order and stops at the first resolution.
enum StepOutcome {
    Resolved(LocationCandidate),
    NotApplicable,
}

pub struct LocationResolver {
    geocoder: Arc<dyn GeocodeClient>,
    reference: (f64, f64),
    jitter: f64,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn GeocodeClient>) -> Self {
        Self {
            geocoder,
            reference: REFERENCE_POINT,
            jitter: JITTER_DEGREES,
        }
    }

    /// Override the synthesized-step reference point (tests, regional deploys).
    pub fn with_reference(mut self, reference: (f64, f64), jitter: f64) -> Self {
        self.reference = reference;
        self.jitter = jitter;
        self
    }

    /// Run the cascade. Post-condition: the returned coordinate lies within
    /// [-90, 90] x [-180, 180] regardless of which step fired.
    pub async fn resolve(
        &self,
        device_fix: Option<&DeviceFix>,
        location_text: Option<&str>,
    ) -> LocationCandidate {
        ensure_metrics_described();

        let outcome = match device_step(device_fix) {
            StepOutcome::Resolved(c) => StepOutcome::Resolved(c),
            StepOutcome::NotApplicable => self.geocode_step(location_text).await,
        };

        let candidate = match outcome {
            StepOutcome::Resolved(c) => c,
            StepOutcome::NotApplicable => self.synthesized_step(),
        };
        clamp_candidate(candidate)
    }

    /// Step 2: exactly one lookup, first candidate wins, no retry.
    async fn geocode_step(&self, location_text: Option<&str>) -> StepOutcome {
        let query = match location_text {
            Some(q) if !q.trim().is_empty() => q,
            _ => return StepOutcome::NotApplicable,
        };

        let hits = match self.geocoder.forward(query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = ?e, geocoder = self.geocoder.name(), "geocoding failed");
                counter!("location_geocode_unavailable_total").increment(1);
                return StepOutcome::NotApplicable;
            }
        };

        let Some(hit) = hits.first() else {
            counter!("location_geocode_unavailable_total").increment(1);
            return StepOutcome::NotApplicable;
        };

        match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => StepOutcome::Resolved(LocationCandidate {
                latitude,
                longitude,
                provenance: Provenance::Geocoded,
            }),
            _ => {
                tracing::warn!(lat = %hit.lat, lon = %hit.lon, "unparseable geocode candidate");
                counter!("location_geocode_unavailable_total").increment(1);
                StepOutcome::NotApplicable
            }
        }
    }

    /// Step 3: bounded jitter around the reference point, explicitly marked
    /// as a placeholder. Always resolves.
    fn synthesized_step(&self) -> LocationCandidate {
        counter!("location_synthesized_total").increment(1);
        let mut rng = rand::thread_rng();
        let mut offset = || {
            if self.jitter > 0.0 {
                rng.gen_range(0.0..self.jitter)
            } else {
                0.0
            }
        };
        LocationCandidate {
            latitude: self.reference.0 + offset(),
            longitude: self.reference.1 + offset(),
            provenance: Provenance::Synthesized,
        }
    }
}

/// Step 1: a device fix is used verbatim; no network call inside the resolver.
fn device_step(device_fix: Option<&DeviceFix>) -> StepOutcome {
    match device_fix {
        Some(fix) => StepOutcome::Resolved(LocationCandidate {
            latitude: fix.latitude,
            longitude: fix.longitude,
            provenance: Provenance::Device,
        }),
        None => StepOutcome::NotApplicable,
    }
}

fn clamp_candidate(mut c: LocationCandidate) -> LocationCandidate {
    c.latitude = c.latitude.clamp(-90.0, 90.0);
    c.longitude = c.longitude.clamp(-180.0, 180.0);
    c
}
