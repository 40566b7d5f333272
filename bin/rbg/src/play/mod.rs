mod cmd;
mod report;
mod round;

pub use cmd::*;
pub use report::*;
pub use round::*;
