//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → exclusion.rs (static asset?)
//!     → excluded: straight to the next handler
//!     → otherwise: through the security shield
//! ```
//!
//! # Design Decisions
//! - Exclusions compiled at startup, immutable at runtime
//! - The shield never sees excluded requests

pub mod exclusion;

pub use exclusion::ExclusionList;
