pub mod combine;
pub mod error;
pub mod model;
pub mod utils;

pub use error::{CombineError, Result};
