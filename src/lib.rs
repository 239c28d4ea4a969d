pub mod backend;
pub mod classifier;
pub mod config;
pub mod enhancer;
pub mod filter;
pub mod models;

pub use backend::{MapsBackendClient, MapsData, SearchBackend, SearchOutcome};
pub use config::{FilterConfig, UserContext, UserValves};
pub use filter::{FilterError, LocationFilter};
pub use models::chat::{ChatMessage, RequestBody};
