//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

//-------------------------------------------------------------------------------------------------------------------

/// Command for a session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionCommand
{
    /// Close the session with a reason (for logs).
    Close(String),
}

//-------------------------------------------------------------------------------------------------------------------

/// Authentication state of a live session.
///
/// A session is `Connected` until its first successful login. The transition happens at most once; the nickname
/// never changes afterwards. There is no `Closed` variant because a closed session no longer routes envelopes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionState
{
    Connected,
    Authenticated{ nickname: String },
}

impl SessionState
{
    /// The session's nickname, if authenticated.
    pub fn nickname(&self) -> Option<&str>
    {
        match self
        {
            Self::Connected                  => None,
            Self::Authenticated{ nickname } => Some(nickname.as_str()),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Receiving ends owned by a session's tasks.
#[derive(Debug)]
pub struct SessionReceivers
{
    /// drained by the session's writer
    pub outbound: mpsc::Receiver<Envelope>,
    /// watched by the session's reader
    pub control: mpsc::UnboundedReceiver<SessionCommand>,
}

//-------------------------------------------------------------------------------------------------------------------

/// Sending side of a session. This is what the [`SessionRegistry`] stores.
///
/// Any task may enqueue envelopes on a handle; only the owning session's writer dequeues them.
#[derive(Debug, Clone)]
pub struct SessionHandle
{
    id: SessionId,
    outbound: mpsc::Sender<Envelope>,
    control: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle
{
    /// Make a handle and the receivers for its session. `queue_size` is clamped to at least 1.
    pub fn new(id: SessionId, queue_size: usize) -> (SessionHandle, SessionReceivers)
    {
        let (outbound_sender, outbound_receiver) = mpsc::channel(queue_size.max(1));
        let (control_sender, control_receiver) = mpsc::unbounded_channel();

        (
            SessionHandle{ id, outbound: outbound_sender, control: control_sender },
            SessionReceivers{ outbound: outbound_receiver, control: control_receiver },
        )
    }

    /// The session's id.
    pub fn id(&self) -> SessionId
    {
        self.id
    }

    /// Enqueue an envelope without waiting.
    pub fn deliver(&self, envelope: Envelope) -> Result<(), DeliveryError>
    {
        match self.outbound.try_send(envelope)
        {
            Ok(())                        => Ok(()),
            Err(TrySendError::Full(_))    => Err(DeliveryError::QueueFull),
            Err(TrySendError::Closed(_))  => Err(DeliveryError::SessionClosed),
        }
    }

    /// Ask the session to close.
    /// - Returns `false` if the session already stopped listening for commands.
    pub fn close(&self, reason: impl Into<String>) -> bool
    {
        self.control.send(SessionCommand::Close(reason.into())).is_ok()
    }

    /// Returns `true` once the session's writer has stopped.
    pub fn is_closed(&self) -> bool
    {
        self.outbound.is_closed()
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Counts live connections.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConnectionCounter
{
    counter: Arc<AtomicU64>,
}

impl ConnectionCounter
{
    pub(crate) fn load(&self) -> u64
    {
        self.counter.load(Ordering::Acquire)
    }

    /// Count a new connection. The count drops again when the guard is dropped.
    pub(crate) fn track(&self) -> ConnectionGuard
    {
        self.counter.fetch_add(1u64, Ordering::AcqRel);
        ConnectionGuard{ counter: self.counter.clone() }
    }
}

/// Keeps one connection counted while alive.
#[derive(Debug)]
pub(crate) struct ConnectionGuard
{
    counter: Arc<AtomicU64>,
}

impl Drop for ConnectionGuard
{
    fn drop(&mut self)
    {
        self.counter.fetch_sub(1u64, Ordering::AcqRel);
    }
}

//-------------------------------------------------------------------------------------------------------------------
