pub mod csv_io;
pub mod discovery;
pub mod grid;

pub use csv_io::*;
pub use discovery::*;
pub use grid::*;
