pub mod classification;
pub mod forecast;
pub mod nutrient;
pub mod recommendation;
pub mod request;
pub mod snapshot;
pub mod weather;

pub use classification::*;
pub use forecast::*;
pub use nutrient::*;
pub use recommendation::*;
pub use request::*;
pub use snapshot::*;
pub use weather::*;
