pub mod error;
pub mod matrix;

pub use error::{LinfitError, LinfitResult, ParseError};
pub use matrix::Matrix;
