//! Request handlers.

pub mod health;
pub mod jobs;
pub mod proxy;
pub mod submissions;

pub use health::*;
pub use jobs::*;
pub use proxy::*;
pub use submissions::*;
