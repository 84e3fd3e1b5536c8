//! Request middleware.

pub mod shield;

pub use shield::{protect, shield_middleware, ShieldState};
