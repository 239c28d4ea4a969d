use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::time::Duration;

use crate::config::FilterConfig;

pub const SEARCH_RADIUS_METERS: u32 = 5000;
pub const SEARCH_PLACE_TYPE: &str = "restaurant";
pub const MAX_PLACES: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SearchRequest {
    query: String,
    radius: u32,
    #[serde(rename = "type")]
    place_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: String,
    pub formatted_address: String,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub website: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub opening_hours: Option<OpeningHours>,
}

/// Mapped search data, ready for prompt templating.
#[derive(Debug, Clone)]
pub struct MapsData {
    pub formatted_places: Vec<String>,
    pub map_url: Option<String>,
    pub directions_url: Option<String>,
    pub center: Option<JsonValue>,
    pub zoom: Option<JsonValue>,
    pub raw: JsonValue,
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Backend reported success with at least one place.
    Formatted(MapsData),
    /// Backend answered 200 without the success/data/places shape; the
    /// parsed JSON is carried through unchanged.
    Raw(JsonValue),
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// One POST to the search endpoint. Every failure maps to `None`.
    async fn search(&self, query: &str) -> Option<SearchOutcome>;
}

pub struct MapsBackendClient {
    http: HttpClient,
    base_url: String,
}

impl MapsBackendClient {
    pub fn new(base_url: String) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(MapsBackendClient { http, base_url })
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(config.maps_api_base_url.clone())
    }
}

#[async_trait]
impl SearchBackend for MapsBackendClient {
    async fn search(&self, query: &str) -> Option<SearchOutcome> {
        let url = format!("{}/api/search", self.base_url.trim_end_matches('/'));
        let payload = SearchRequest {
            query: query.to_string(),
            radius: SEARCH_RADIUS_METERS,
            place_type: SEARCH_PLACE_TYPE.to_string(),
        };

        info!("Calling maps backend: {}", url);
        let resp = match self.http.post(&url).json(&payload).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Network error calling maps backend: {}", e);
                return None;
            }
        };

        let status = resp.status();
        info!("Maps backend response status: {}", status);
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!("Maps backend error: {} - {}", status, body);
            return None;
        }

        match resp.json::<JsonValue>().await {
            Ok(raw) => outcome_from_response(raw),
            Err(e) => {
                warn!("Invalid JSON from maps backend: {}", e);
                None
            }
        }
    }
}

/// Maps a parsed backend response to an outcome. Pure, so the shape handling
/// is testable without the HTTP layer.
pub fn outcome_from_response(raw: JsonValue) -> Option<SearchOutcome> {
    let success = raw
        .get("success")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    if success {
        if let Some(data) = raw.get("data") {
            let places = data
                .get("places")
                .and_then(JsonValue::as_array)
                .filter(|places| !places.is_empty());

            if let Some(places) = places {
                let mut formatted_places = Vec::with_capacity(MAX_PLACES);
                for entry in places.iter().take(MAX_PLACES) {
                    let place: Place = match serde_json::from_value(entry.clone()) {
                        Ok(place) => place,
                        Err(e) => {
                            warn!("Malformed place entry from maps backend: {}", e);
                            return None;
                        }
                    };
                    formatted_places.push(format_place(&place));
                }

                let map_url = data
                    .get("map_url")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string);
                let directions_url = data
                    .get("directions_url")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string);
                let center = data.get("center").cloned();
                let zoom = data.get("zoom").cloned();

                return Some(SearchOutcome::Formatted(MapsData {
                    formatted_places,
                    map_url,
                    directions_url,
                    center,
                    zoom,
                    raw,
                }));
            }
        }
    }

    Some(SearchOutcome::Raw(raw))
}

/// Formats one place into the text block injected into the model context.
/// Optional fields are skipped when absent or empty.
pub fn format_place(place: &Place) -> String {
    let mut info = format!("📍 **{}**", place.name);
    if let Some(rating) = place.rating.filter(|rating| *rating > 0.0) {
        info.push_str(&format!(" (⭐ {}/5)", rating));
    }
    info.push_str(&format!("\n   📍 {}", place.formatted_address));
    if let Some(level) = place.price_level.filter(|level| *level > 0) {
        info.push_str(&format!(
            "\n   💰 Price Level: {}",
            "💰".repeat(level as usize)
        ));
    }
    if let Some(website) = place.website.as_deref().filter(|site| !site.is_empty()) {
        info.push_str(&format!("\n   🌐 Website: {}", website));
    }
    if let Some(phone) = place
        .formatted_phone_number
        .as_deref()
        .filter(|phone| !phone.is_empty())
    {
        info.push_str(&format!("\n   📞 Phone: {}", phone));
    }
    if let Some(open_now) = place.opening_hours.as_ref().and_then(|hours| hours.open_now) {
        let status = if open_now { "🟢 Open Now" } else { "🔴 Closed" };
        info.push_str(&format!("\n   🕒 Status: {}", status));
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place_entry(name: &str) -> JsonValue {
        json!({ "name": name, "formatted_address": format!("{} street", name) })
    }

    #[test]
    fn caps_formatted_places_at_five_in_order() {
        let places: Vec<JsonValue> = (1..=7).map(|i| place_entry(&format!("Place {}", i))).collect();
        let raw = json!({ "success": true, "data": { "places": places } });

        match outcome_from_response(raw).unwrap() {
            SearchOutcome::Formatted(data) => {
                assert_eq!(data.formatted_places.len(), MAX_PLACES);
                for (i, block) in data.formatted_places.iter().enumerate() {
                    assert!(block.starts_with(&format!("📍 **Place {}**", i + 1)));
                }
            }
            SearchOutcome::Raw(_) => panic!("expected formatted outcome"),
        }
    }

    #[test]
    fn unsuccessful_response_passes_through_raw() {
        let raw = json!({ "success": false, "error": "quota" });
        match outcome_from_response(raw.clone()).unwrap() {
            SearchOutcome::Raw(value) => assert_eq!(value, raw),
            SearchOutcome::Formatted(_) => panic!("expected raw outcome"),
        }
    }

    #[test]
    fn success_without_places_passes_through_raw() {
        let raw = json!({ "success": true, "data": { "places": [] } });
        assert!(matches!(
            outcome_from_response(raw).unwrap(),
            SearchOutcome::Raw(_)
        ));
    }

    #[test]
    fn malformed_place_drops_the_result() {
        let raw = json!({
            "success": true,
            "data": { "places": [ { "rating": 4.5 } ] }
        });
        assert!(outcome_from_response(raw).is_none());
    }

    #[test]
    fn map_links_and_viewport_are_captured() {
        let raw = json!({
            "success": true,
            "data": {
                "places": [ place_entry("Kafe Biru") ],
                "map_url": "https://maps.example/view",
                "directions_url": "https://maps.example/dir",
                "center": { "lat": -6.2, "lng": 106.8 },
                "zoom": 13
            }
        });

        match outcome_from_response(raw).unwrap() {
            SearchOutcome::Formatted(data) => {
                assert_eq!(data.map_url.as_deref(), Some("https://maps.example/view"));
                assert_eq!(data.directions_url.as_deref(), Some("https://maps.example/dir"));
                assert_eq!(data.zoom, Some(json!(13)));
                assert!(data.center.is_some());
            }
            SearchOutcome::Raw(_) => panic!("expected formatted outcome"),
        }
    }

    #[test]
    fn formats_fully_populated_place() {
        let place: Place = serde_json::from_value(json!({
            "name": "Warung Sate",
            "formatted_address": "Jl. Sudirman 1, Jakarta",
            "rating": 4.5,
            "price_level": 2,
            "website": "https://warungsate.example",
            "formatted_phone_number": "+62 21 555 0100",
            "opening_hours": { "open_now": true }
        }))
        .unwrap();

        let block = format_place(&place);
        assert!(block.starts_with("📍 **Warung Sate** (⭐ 4.5/5)"));
        assert!(block.contains("\n   📍 Jl. Sudirman 1, Jakarta"));
        assert!(block.contains("\n   💰 Price Level: 💰💰"));
        assert!(block.contains("\n   🌐 Website: https://warungsate.example"));
        assert!(block.contains("\n   📞 Phone: +62 21 555 0100"));
        assert!(block.contains("\n   🕒 Status: 🟢 Open Now"));
    }

    #[test]
    fn formats_minimal_place_without_optional_lines() {
        let place: Place = serde_json::from_value(json!({
            "name": "Pasar Baru",
            "formatted_address": "Jakarta Pusat"
        }))
        .unwrap();

        let block = format_place(&place);
        assert_eq!(block, "📍 **Pasar Baru**\n   📍 Jakarta Pusat");
    }

    #[test]
    fn closed_place_shows_closed_status() {
        let place: Place = serde_json::from_value(json!({
            "name": "Toko Buku",
            "formatted_address": "Bandung",
            "opening_hours": { "open_now": false }
        }))
        .unwrap();

        assert!(format_place(&place).contains("🕒 Status: 🔴 Closed"));
    }

    #[test]
    fn empty_website_and_phone_are_skipped() {
        let place: Place = serde_json::from_value(json!({
            "name": "Kafe",
            "formatted_address": "Surabaya",
            "website": "",
            "formatted_phone_number": ""
        }))
        .unwrap();

        let block = format_place(&place);
        assert!(!block.contains("Website"));
        assert!(!block.contains("Phone"));
    }
}
