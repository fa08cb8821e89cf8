pub mod provider;
pub mod pull_request;
pub mod review;

pub use provider::*;
pub use pull_request::*;
pub use review::*;
