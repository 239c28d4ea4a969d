/// Keywords that indicate location-based queries.
const LOCATION_KEYWORDS: &[&str] = &[
    // English keywords
    "find", "search", "locate", "where", "near", "nearby", "around", "closest", "nearest",
    "restaurant", "coffee", "shop", "store", "hotel", "gas station", "bank", "hospital",
    "pharmacy", "mall", "market",
    // Indonesian keywords
    "cari", "temukan", "dimana", "dekat", "terdekat", "sekitar", "lokasi", "tempat",
    "restoran", "rumah makan", "warung", "kafe", "toko", "hotel", "spbu", "bank",
    "rumah sakit", "apotek", "mall", "pasar",
];

/// Case-insensitive substring containment over the fixed keyword set.
/// No tokenization; false positives are an accepted tradeoff.
pub fn is_location_query(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    LOCATION_KEYWORDS
        .iter()
        .any(|keyword| message_lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_english_keywords_case_insensitively() {
        assert!(is_location_query("FIND a coffee place"));
        assert!(is_location_query("Where is the nearest bank?"));
        assert!(is_location_query("any good Restaurant here"));
    }

    #[test]
    fn matches_indonesian_keywords() {
        assert!(is_location_query("cari restoran enak"));
        assert!(is_location_query("Dimana apotek terdekat?"));
        assert!(is_location_query("warung di sekitar sini"));
    }

    #[test]
    fn rejects_messages_without_keywords() {
        assert!(!is_location_query("hello world"));
        assert!(!is_location_query(""));
    }

    #[test]
    fn substring_matches_are_accepted() {
        // "nearly" contains "near"; containment over tokens is intentional.
        assert!(is_location_query("we are nearly done"));
    }
}
