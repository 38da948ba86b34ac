//! Urbanwatch Geocode Adapter
//!
//! Reverse-geocodes GPS fixes through Nominatim. Resolution failure is
//! never an error: the adapter degrades to sentinel values so a flaky
//! provider cannot abort an analyze request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use urbanwatch_core::{GeocodeProvider, ResolvedLocation};

/// Nominatim usage policy requires an identifying User-Agent.
const NOMINATIM_USER_AGENT: &str = "urbanwatch/0.1 (urban maintenance reporting)";

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Geocoder against the public Nominatim instance.
    pub fn new() -> Self {
        Self::with_base_url("https://nominatim.openstreetmap.org")
    }

    /// Geocoder against a specific instance (self-hosted, or a test stub).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn request(&self, lat: f64, lon: f64) -> Option<Value> {
        let url = format!("{}/reverse", self.base_url);
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(NOMINATIM_USER_AGENT));

        let resp = self
            .client
            .get(url)
            .headers(headers)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
                ("accept-language", "en".to_string()),
            ])
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Nominatim returned an error status");
            return None;
        }
        resp.json::<Value>().await.ok()
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    async fn reverse(&self, lat: f64, lon: f64) -> ResolvedLocation {
        match self.request(lat, lon).await {
            Some(json) => match location_from_json(&json) {
                Some(location) => {
                    debug!(city = %location.city, "Reverse geocode resolved");
                    location
                }
                None => {
                    warn!(lat, lon, "Nominatim response had no usable address");
                    ResolvedLocation::unknown()
                }
            },
            None => {
                warn!(lat, lon, "Reverse geocode request failed; using sentinels");
                ResolvedLocation::unknown()
            }
        }
    }
}

/// Extract the formatted address and the city from a Nominatim reverse
/// response. City priority: `city`, then `town`, then `village`.
fn location_from_json(json: &Value) -> Option<ResolvedLocation> {
    let address = json["display_name"].as_str()?.to_string();
    let components = &json["address"];
    let city = ["city", "town", "village"]
        .iter()
        .find_map(|key| components[*key].as_str())
        .unwrap_or("Unknown")
        .to_string();
    Some(ResolvedLocation { address, city })
}
