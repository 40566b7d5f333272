//! Transaction requests, their resolution and submission.

mod request;
pub use request::*;

mod resolver;
pub use resolver::*;

mod rpc;
pub use rpc::*;

mod sender;
pub use sender::*;

mod value;
pub use value::*;
