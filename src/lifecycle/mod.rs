//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile rules → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Delayed honeypot responses are drained like any other request

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
