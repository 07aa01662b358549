pub mod cost;
pub mod driver;
pub mod error;
pub mod number;
pub mod selection;

pub use cost::*;
pub use driver::*;
pub use error::*;
pub use number::*;
pub use selection::*;
