//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower layers)
//!     → middleware/shield.rs (exclusion check, classification)
//!         → rejected: synthesized 400/403/404
//!         → passed: upstream.rs (forward to origin)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;
pub mod upstream;

pub use middleware::{protect, ShieldState};
pub use server::{HttpServer, ServerError};
pub use upstream::{Upstream, UpstreamError};
