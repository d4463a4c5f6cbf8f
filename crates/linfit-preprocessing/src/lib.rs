pub mod builder;
pub mod encoder;
pub mod profile;
pub mod split;

pub use builder::*;
pub use encoder::*;
pub use profile::*;
pub use split::*;
