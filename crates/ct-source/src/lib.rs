pub mod dataset;
pub mod generate;
pub mod memory;
pub mod traits;

pub use dataset::*;
pub use generate::*;
pub use memory::*;
pub use traits::*;
