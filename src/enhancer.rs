use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MAP_TITLE_RE: Regex = Regex::new("(Google Maps|Maps|Lokasi|Location)").unwrap();
    static ref ADDRESS_RE: Regex = Regex::new("(Address|Alamat):").unwrap();
    static ref RATING_RE: Regex = Regex::new("(Rating|⭐)").unwrap();
    static ref DIRECTION_RE: Regex = Regex::new("(Direction|Petunjuk|Arah)").unwrap();
}

/// Prefixes location phrases in the model reply with emoji. The four
/// substitutions run in a fixed order and the pass is not idempotent:
/// applying it twice duplicates the emoji. Callers run it once per response.
pub fn enhance_maps_response(content: &str) -> String {
    let enhanced = MAP_TITLE_RE.replace_all(content, "🗺️ ${1}");
    let enhanced = ADDRESS_RE.replace_all(&enhanced, "📍 ${1}:");
    let enhanced = RATING_RE.replace_all(&enhanced, "⭐ Rating");
    let enhanced = DIRECTION_RE.replace_all(&enhanced, "🧭 ${1}");
    enhanced.into_owned()
}
