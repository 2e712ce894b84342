//module tree
mod chat_log;
mod config;
mod connection_handler;
mod errors;
mod registry;
mod router;
mod server;
mod server_event;
mod session_handler;
mod session_utils;

//API exports
pub use crate::server::chat_log::*;
pub use crate::server::config::*;
pub(crate) use crate::server::connection_handler::*;
pub use crate::server::errors::*;
pub use crate::server::registry::*;
pub use crate::server::router::*;
pub use crate::server::server::*;
pub use crate::server::server_event::*;
pub(crate) use crate::server::session_handler::*;
pub use crate::server::session_utils::*;
