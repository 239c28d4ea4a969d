use serde::Deserialize;
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_GLOBAL_MAX_TURNS: usize = 8;
pub const DEFAULT_USER_MAX_TURNS: usize = 4;

/// Operator-level settings, injected into the filter at construction time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Priority level for the filter operations.
    pub priority: i32,
    /// Maximum allowable conversation turns for a user.
    pub max_turns: usize,
    /// Base URL for the location-search backend.
    pub maps_api_base_url: String,
    /// Enable the location-search integration for location queries.
    pub enable_maps_integration: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            priority: 0,
            max_turns: DEFAULT_GLOBAL_MAX_TURNS,
            maps_api_base_url: env::var("MAPS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            enable_maps_integration: true,
        }
    }
}

/// Per-user overrides. Absent fields fall back to the documented defaults
/// through the accessor methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserValves {
    /// Maximum allowable conversation turns for this user.
    pub max_turns: Option<usize>,
    /// Enable the location-search integration for this user.
    pub enable_maps_for_user: Option<bool>,
}

impl UserValves {
    pub fn max_turns_or_default(&self) -> usize {
        self.max_turns.unwrap_or(DEFAULT_USER_MAX_TURNS)
    }

    pub fn maps_enabled(&self) -> bool {
        self.enable_maps_for_user.unwrap_or(true)
    }
}

/// The user record the host passes alongside each hook call. Unknown fields
/// are ignored; a missing role means an admin session.
#[derive(Debug, Clone, Deserialize)]
pub struct UserContext {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub valves: Option<UserValves>,
}

impl Default for UserContext {
    fn default() -> Self {
        UserContext {
            role: default_role(),
            valves: None,
        }
    }
}

fn default_role() -> String {
    "admin".to_string()
}
