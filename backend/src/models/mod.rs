pub mod chat;
pub mod pull_request;
pub mod score;

pub use chat::*;
pub use pull_request::*;
pub use score::*;
