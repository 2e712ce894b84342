//documentation
#![doc = include_str!("../README.md")]

//module tree
mod client;
mod common;
mod credentials;
mod errors;
mod frame;
mod rate_limiter;
mod server;

//API exports
pub use crate::client::*;
pub use crate::common::*;
pub use crate::credentials::*;
pub use crate::errors::*;
pub use crate::frame::*;
pub use crate::rate_limiter::*;
pub use crate::server::*;
