use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The closed set of issue categories the detector is trained on.
///
/// Deserialization of any other label string fails, which is what keeps
/// arbitrary values out of the marker file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueLabel {
    Pothole,
    Graffiti,
}

impl IssueLabel {
    /// Wire representation, matching the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueLabel::Pothole => "pothole",
            IssueLabel::Graffiti => "graffiti",
        }
    }
}

impl fmt::Display for IssueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (label, confidence) pair returned by the detector for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: IssueLabel,
    /// In [0, 1], rounded to two decimals by the detection adapter.
    pub confidence: f32,
}

/// A persisted record of one detected issue at a location and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: IssueLabel,
    /// ISO-8601 UTC, generated at record-creation time, never caller-supplied.
    pub timestamp: String,
    /// Resolved city name, or "Unknown" when resolution failed.
    pub city: String,
}

impl Marker {
    /// Build one marker per detection of a single upload.
    ///
    /// All markers of the batch share lat/lon/city and a single timestamp;
    /// only the label differs.
    pub fn batch(lat: f64, lon: f64, city: &str, detections: &[Detection]) -> Vec<Marker> {
        let timestamp = Utc::now().to_rfc3339();
        detections
            .iter()
            .map(|d| Marker {
                lat,
                lon,
                label: d.label,
                timestamp: timestamp.clone(),
                city: city.to_string(),
            })
            .collect()
    }
}

/// Address resolution result from the geocode adapter.
///
/// Always populated: failures degrade to the sentinel values instead of
/// surfacing as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub address: String,
    pub city: String,
}

impl ResolvedLocation {
    /// Sentinel location used when the provider fails or finds no match.
    pub fn unknown() -> Self {
        Self {
            address: "Unknown location".to_string(),
            city: "Unknown".to_string(),
        }
    }
}

/// An upload decoded and scaled to the detector's working resolution.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8, row-major, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}
