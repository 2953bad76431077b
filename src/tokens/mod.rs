//! Token counting
//!
//! Wire types and the dispatcher that routes a count request to the
//! provider owning the requested model.

pub mod dispatcher;
pub mod types;

pub use dispatcher::Dispatcher;
pub use types::{CountRequest, CountResponse, Message, Role};
