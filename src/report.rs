//! # Report Data Model
//! Wire types shared with the external ingestion service. Reports arrive
//! fully classified: `severity` and `priority_score` are computed upstream
//! and are read-only in this crate — nothing here recomputes or edits them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse triage category assigned by the upstream damage classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    Critical,
}

/// Provenance of the submitted imagery. Wire form is the fixed lowercase
/// token set the ingestion endpoint validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Citizen,
    Drone,
    Satellite,
    Cctv,
}

impl ReportSource {
    /// Token sent in the multipart `source` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Citizen => "citizen",
            ReportSource::Drone => "drone",
            ReportSource::Satellite => "satellite",
            ReportSource::Cctv => "cctv",
        }
    }
}

impl std::str::FromStr for ReportSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "citizen" => Ok(ReportSource::Citizen),
            "drone" => Ok(ReportSource::Drone),
            "satellite" => Ok(ReportSource::Satellite),
            "cctv" => Ok(ReportSource::Cctv),
            other => Err(format!(
                "unknown source '{other}' (expected citizen, drone, satellite, or cctv)"
            )),
        }
    }
}

/// One submitted, already-classified disaster-scene record as returned by
/// the listing endpoint. Collection fields tolerate absence so older rows
/// without suggestions still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub image_path: String,
    pub image_source: String,
    pub location_name: Option<String>,
    /// Absent means "unresolved"; present values are in [-90, 90].
    pub latitude: Option<f64>,
    /// Absent means "unresolved"; present values are in [-180, 180].
    pub longitude: Option<f64>,
    pub damage_detected: bool,
    #[serde(default)]
    pub damage_types: Vec<String>,
    pub severity: Severity,
    /// Classifier confidence in [0, 1].
    pub confidence: f32,
    /// Upstream-computed urgency metric in [0, 100]; drives ranking.
    pub priority_score: i32,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub suggested_supplies: Vec<String>,
    #[serde(default)]
    pub required_resources: Vec<String>,
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sos_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(with = "backend_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// The ingestion service stores creation instants as naive UTC, so its JSON
/// carries no offset (`"2025-08-16T10:00:00"`). Accept both that form and a
/// full RFC 3339 timestamp; emit RFC 3339.
mod backend_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
