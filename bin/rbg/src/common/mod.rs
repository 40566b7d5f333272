mod args;
mod deployment;
mod error;
mod logging;

pub use args::*;
pub use deployment::*;
pub use error::*;
pub use logging::*;
