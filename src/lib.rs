//! Irrigation and fertilizer advice for smallholder fields.
//!
//! A [`logic::FusionEngine`] reconciles soil sensor readings, a live weather
//! forecast and a learned per-field rainfall forecast into one
//! [`models::Recommendation`] with an ordered rationale. Threshold tables are
//! authoritative; the soil classifier only corroborates.

pub mod config;
pub mod datasources;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{Result, RootSphereError};
