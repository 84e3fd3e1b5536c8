//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, rule patterns compiled)
//!     → AppConfig (validated, immutable)
//!     → read once at startup to build the shield and the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AgentListConfig, AppConfig, EdgeConfig, ExclusionConfig, ExtraRulesConfig, ListenerConfig,
    LogFormat, ObservabilityConfig, ShieldConfig, TimeoutConfig, UpstreamConfig,
};
