use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value as JsonValue };

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    /// Fields the host attaches to a message (ids, timestamps) ride along untouched.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ChatMessage {
    pub fn system(content: String) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content,
            extra: Map::new(),
        }
    }
}

/// The in-flight request body handed to the pre-call hook. Only `messages`
/// is interpreted; everything else round-trips through `extra`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}
