pub mod agronomy;
pub mod calculations;
pub mod classifier;
pub mod forecast;
pub mod fusion;
pub mod service;
pub mod standards;

pub use agronomy::AgronomyTables;
pub use forecast::ForecastAdapter;
pub use fusion::FusionEngine;
pub use service::RecommendationService;
pub use standards::NutrientStandards;
