//! Edge Request Security Shield Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::AppConfig;
pub use http::{HttpServer, ShieldState};
pub use lifecycle::Shutdown;
pub use security::{Action, Decision, RequestSnapshot, Shield};
