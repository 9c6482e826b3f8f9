pub mod cli;
pub mod error;
pub mod fetch;
pub mod heat;
pub mod model;
pub mod util;

pub use error::{ContribError, Result};
