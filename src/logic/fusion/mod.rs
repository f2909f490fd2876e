pub mod completeness;
pub mod engine;
pub mod fertilizer;
pub mod irrigation;

pub use engine::FusionEngine;
pub use irrigation::{DISAGREEMENT_ALERT, HEAVY_RAIN_ALERT};
