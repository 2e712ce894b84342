//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Emitted by clients when they connect/disconnect/shut down.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ClientReport
{
    /// The client connected to the server.
    Connected,
    /// The connection failed or was closed by the server.
    Disconnected,
    /// The client closed itself.
    ClosedBySelf,
    /// The client has died. No more events will be emitted after this event appears.
    IsDead,
}

//-------------------------------------------------------------------------------------------------------------------

/// An event received by a client.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ClientEvent
{
    /// A connection report.
    Report(ClientReport),
    /// An envelope from the server (replies and chat from other users).
    Msg(Envelope),
}

//-------------------------------------------------------------------------------------------------------------------
