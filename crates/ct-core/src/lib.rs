pub mod backoff;
pub mod campaign;
pub mod controller;
pub mod engine;
pub mod error;
pub mod ids;
pub mod kpi;
pub mod model;
pub mod notices;
pub mod progress;
pub mod selection;
pub mod snapshot;
pub mod types;
pub mod view;

pub use backoff::*;
pub use campaign::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use ids::*;
pub use kpi::*;
pub use model::*;
pub use notices::*;
pub use progress::*;
pub use selection::*;
pub use snapshot::*;
pub use types::*;
pub use view::*;
