pub mod gradient;
pub mod model;
pub mod trainer;

pub use gradient::*;
pub use model::*;
pub use trainer::*;
