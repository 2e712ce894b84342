//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::net::SocketAddr;

//-------------------------------------------------------------------------------------------------------------------

/// Emitted by servers as sessions move through their lifecycle.
///
/// Reports for one session arrive in order: `Connected`, then optionally `Authenticated`, then `Disconnected`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ServerReport
{
    /// A connection was accepted.
    Connected(SessionId, SocketAddr),
    /// The session logged in and is now registered under the nickname.
    Authenticated(SessionId, String),
    /// The session closed. Its registry entry (if any) has been removed.
    Disconnected(SessionId),
}

//-------------------------------------------------------------------------------------------------------------------
