//module tree
mod client;
mod client_event;
mod client_handler;
mod config;
mod errors;

//API exports
pub use client::*;
pub use client_event::*;
pub(crate) use client_handler::*;
pub use config::*;
pub use errors::*;
