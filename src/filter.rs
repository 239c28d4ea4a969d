use log::{debug, info};
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::backend::{MapsBackendClient, SearchBackend, SearchOutcome};
use crate::classifier;
use crate::config::{FilterConfig, UserContext, UserValves, DEFAULT_USER_MAX_TURNS};
use crate::enhancer;
use crate::models::chat::{ChatMessage, RequestBody};

#[derive(Debug)]
pub enum FilterError {
    TurnLimitExceeded { limit: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::TurnLimitExceeded { limit } => {
                write!(f, "Conversation turn limit exceeded. Max turns: {}", limit)
            }
        }
    }
}

impl StdError for FilterError {}

/// The filter the host wires around each model turn: `inlet` before the
/// model call, `outlet` after it. Holds only the injected configuration and
/// the backend client, so one instance is safe to share across requests.
pub struct LocationFilter {
    config: FilterConfig,
    backend: Arc<dyn SearchBackend>,
}

impl LocationFilter {
    pub fn new(config: FilterConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let backend = Arc::new(MapsBackendClient::from_config(&config)?);
        Ok(LocationFilter { config, backend })
    }

    pub fn with_backend(config: FilterConfig, backend: Arc<dyn SearchBackend>) -> Self {
        LocationFilter { config, backend }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Pre-call hook. Checks the turn limit, then decides whether the latest
    /// user message warrants a backend search; on a hit, prepends the search
    /// context as the first message of the conversation.
    pub async fn inlet(
        &self,
        mut body: RequestBody,
        user: Option<&UserContext>,
    ) -> Result<RequestBody, FilterError> {
        if let Some(user) = user {
            self.check_turn_limit(&body, user)?;
        }

        if !self.config.enable_maps_integration {
            info!("Maps integration disabled globally");
            return Ok(body);
        }
        if let Some(valves) = user.and_then(|user| user.valves.as_ref()) {
            if !valves.maps_enabled() {
                info!("Maps integration disabled for user");
                return Ok(body);
            }
        }

        let user_query = match body.messages.last() {
            Some(message) if message.role == "user" => message.content.clone(),
            _ => return Ok(body),
        };

        if !classifier::is_location_query(&user_query) {
            debug!("Not a location query, skipping maps integration");
            return Ok(body);
        }
        info!("Location query detected: {}", user_query);

        let outcome = match self.backend.search(&user_query).await {
            Some(outcome) => outcome,
            None => {
                info!("No maps result received");
                return Ok(body);
            }
        };

        let maps_context = create_maps_context(&outcome, &user_query);
        body.messages
            .insert(0, ChatMessage::system(build_system_prompt(&maps_context)));
        info!("Enhanced messages with maps context");
        Ok(body)
    }

    /// Post-call hook. Rewrites the reply text in place with emoji prefixes;
    /// a body without recognizable content is returned unchanged.
    pub fn outlet(&self, mut body: JsonValue, _user: Option<&UserContext>) -> JsonValue {
        let content = match extract_response_content(&body) {
            Some(content) if !content.is_empty() => content,
            _ => return body,
        };

        let enhanced = enhancer::enhance_maps_response(&content);
        if let Some(slot) = response_content_slot(&mut body) {
            *slot = JsonValue::String(enhanced);
        }
        body
    }

    // The guard applies to user and admin roles; with no user context the
    // host is calling outside a session and the limit is not enforced.
    fn check_turn_limit(&self, body: &RequestBody, user: &UserContext) -> Result<(), FilterError> {
        if !matches!(user.role.as_str(), "user" | "admin") {
            return Ok(());
        }

        let user_max_turns = user
            .valves
            .as_ref()
            .map(UserValves::max_turns_or_default)
            .unwrap_or(DEFAULT_USER_MAX_TURNS);
        let limit = user_max_turns.min(self.config.max_turns);

        info!("Turn check: {}/{}", body.messages.len(), limit);
        if body.messages.len() > limit {
            return Err(FilterError::TurnLimitExceeded { limit });
        }
        Ok(())
    }
}

fn create_maps_context(outcome: &SearchOutcome, query: &str) -> String {
    let (places_text, map_url, directions_url) = match outcome {
        SearchOutcome::Formatted(data) => {
            let places_text = if data.formatted_places.is_empty() {
                "No places found".to_string()
            } else {
                data.formatted_places.join("\n\n")
            };
            (
                places_text,
                data.map_url.clone().unwrap_or_default(),
                data.directions_url.clone().unwrap_or_default(),
            )
        }
        SearchOutcome::Raw(_) => (
            "No places found".to_string(),
            String::new(),
            String::new(),
        ),
    };

    format!(
        "GOOGLE MAPS SEARCH RESULTS for query: \"{}\"\n\nFOUND LOCATIONS:\n{}\n\nMAP LINKS:\n- View on Google Maps: {}\n- Get Directions: {}\n\nPlease use this Google Maps data to provide a helpful response about these locations.",
        query, places_text, map_url, directions_url
    )
}

fn build_system_prompt(maps_context: &str) -> String {
    format!(
        "You are GoogleMapsAI, an intelligent assistant that helps users find locations using Google Maps data.\n\n{}\n\nPlease provide a helpful, conversational response about these locations. Include:\n1. A brief summary of what was found\n2. Key details about the top locations (name, rating, address)\n3. Helpful suggestions or recommendations\n4. Map and directions links when relevant\n\nBe natural, friendly, and informative in your response.",
        maps_context
    )
}

fn extract_response_content(body: &JsonValue) -> Option<String> {
    match body.get("choices").and_then(JsonValue::as_array) {
        Some(choices) if !choices.is_empty() => choices[0]
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        _ => body
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(JsonValue::as_str)
            .map(str::to_string),
    }
}

fn response_content_slot(body: &mut JsonValue) -> Option<&mut JsonValue> {
    let has_choices = body
        .get("choices")
        .and_then(JsonValue::as_array)
        .map(|choices| !choices.is_empty())
        .unwrap_or(false);

    if has_choices {
        body.get_mut("choices")
            .and_then(|choices| choices.get_mut(0))
            .and_then(|choice| choice.get_mut("message"))
            .and_then(|message| message.get_mut("content"))
    } else {
        body.get_mut("message")
            .and_then(|message| message.get_mut("content"))
    }
}
