//local shortcuts
use crate::*;

//third-party shortcuts
use enfync::Handle;
use tokio::sync::mpsc;

//standard shortcuts
use core::fmt::Debug;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

//-------------------------------------------------------------------------------------------------------------------

/// A client for chatting through a [`Server`].
///
/// Use a [`ClientFactory`] to produce a new client.
///
/// It is safe to drop a client, however if you need a complete shut-down procedure then follow these steps:
/// 1) Call [`Client::close()`].
/// 2) Wait for [`Client::is_dead()`] to return true.
/// 3) Call [`Client::next()`] to drain any lingering events. [`ClientReport::IsDead`] will be the last event.
/// 4) Drop the client.
#[derive(Debug)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::system::Resource))]
pub struct Client
{
    /// the server's address
    server_address: SocketAddr,
    /// config used to pre-check outgoing envelopes
    config: ClientConfig,
    /// sends commands to the client backend
    command_sender: mpsc::UnboundedSender<ClientCommand>,
    /// sender for client events
    client_event_sender: crossbeam::channel::Sender<ClientEvent>,
    /// receiver for client events
    client_event_receiver: crossbeam::channel::Receiver<ClientEvent>,
    /// nickname assigned by the server on login
    nickname: Arc<Mutex<Option<String>>>,
    /// signal for when the client backend is shut down
    client_closed_signal: enfync::PendingResult<()>,
    /// flag indicating the client closed itself
    closed_by_self: AtomicBool,
}

impl Client
{
    /// Sends an envelope to the server.
    ///
    /// Envelopes sent before the connection is established are delivered once it is. Returns
    /// [`ClientError::Oversized`] if the envelope can't be framed within the configured size limit.
    pub fn send(&self, envelope: Envelope) -> Result<(), ClientError>
    {
        if self.is_closed() { tracing::warn!("tried to send envelope to closed client"); return Err(ClientError::Closed); }

        match encode_envelope(&envelope, self.config.max_msg_size)
        {
            Ok(_) => (),
            Err(FrameError::Oversized(size)) =>
            {
                tracing::warn!(size, "tried to send oversized envelope");
                return Err(ClientError::Oversized);
            }
            Err(err) =>
            {
                tracing::error!(?err, "failed serializing client envelope");
                return Err(ClientError::Oversized);
            }
        }

        if self.command_sender.send(ClientCommand::Send(envelope)).is_err()
        {
            tracing::warn!("tried to send envelope to dead client");
            return Err(ClientError::Closed);
        }

        tracing::trace!("sending envelope to server");
        Ok(())
    }

    /// Asks the server to log in as `username`.
    pub fn login(&self, username: &str, password: &str) -> Result<(), ClientError>
    {
        self.send(Envelope::login(username, password))
    }

    /// Asks the server to create an account.
    pub fn register(&self, username: &str, password: &str, nickname: &str) -> Result<(), ClientError>
    {
        self.send(Envelope::register(username, password, nickname))
    }

    /// Sends a chat message to everyone online.
    ///
    /// The server stamps the sender itself, so this may be called before the login reply arrives.
    pub fn chat(&self, content: impl Into<String>) -> Result<(), ClientError>
    {
        let sender = self.nickname().unwrap_or_default();
        self.send(Envelope::chat(sender, content))
    }

    /// Tries to get the next client event.
    ///
    /// When the client dies, the last event emitted will be `ClientEvent::Report(ClientReport::IsDead)`.
    pub fn next(&self) -> Option<ClientEvent>
    {
        self.client_event_receiver.try_recv().ok()
    }

    /// The nickname the server assigned on login, if logged in.
    pub fn nickname(&self) -> Option<String>
    {
        self.nickname.lock().ok().and_then(|nickname| nickname.clone())
    }

    /// The server's address.
    pub fn server_address(&self) -> SocketAddr
    {
        self.server_address
    }

    /// Tests if the client is dead (no longer connected to the server).
    ///
    /// Once this returns true you can drain the client by calling [`Client::next()`] until no more values appear.
    /// After [`ClientReport::IsDead`] appears, [`Client::next()`] will always return `None`.
    pub fn is_dead(&self) -> bool
    {
        self.client_closed_signal.done()
    }

    /// Tests if the client is closed.
    ///
    /// Returns true after [`Client::close()`] has been called, or once the client backend dies.
    pub fn is_closed(&self) -> bool
    {
        self.closed_by_self.load(Ordering::Acquire) || self.is_dead()
    }

    /// Closes the client.
    ///
    /// Envelopes already handed to [`Client::send()`] are flushed before the connection is shut down.
    ///
    /// The client will eventually emit [`ClientReport::IsDead`] once this method has been called.
    pub fn close(&self)
    {
        if self.is_closed() { tracing::warn!("tried to close an already closed client"); return; }
        tracing::info!("client closing self");

        if let Err(err) = self.client_event_sender.send(ClientEvent::Report(ClientReport::ClosedBySelf))
        {
            tracing::error!(?err, "failed to forward connection event to client");
        }

        self.closed_by_self.store(true, Ordering::Release);

        if self.command_sender.send(ClientCommand::Close).is_err()
        {
            tracing::warn!("tried to close an already dead client");
        }
    }
}

impl Drop for Client
{
    fn drop(&mut self)
    {
        if self.is_closed() { return; }
        self.close();
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Factory for producing [`Client`]s that share a config.
#[derive(Debug, Clone, Default)]
pub struct ClientFactory
{
    config: ClientConfig,
}

impl ClientFactory
{
    /// Makes a new client factory.
    pub fn new(config: ClientConfig) -> Self
    {
        ClientFactory{ config }
    }

    /// Makes a new client connected to `server_address`.
    ///
    /// The connection is established in the background. [`ClientReport::Connected`] is emitted on success.
    pub fn new_client(&self,
        runtime_handle : enfync::builtin::native::TokioHandle,
        server_address : SocketAddr,
    ) -> Client
    {
        let (command_sender, command_receiver) = mpsc::unbounded_channel::<ClientCommand>();
        let (client_event_sender, client_event_receiver) = crossbeam::channel::unbounded::<ClientEvent>();
        let nickname = Arc::new(Mutex::new(None));

        let handler = ClientHandler{
                config              : self.config,
                client_event_sender : client_event_sender.clone(),
                nickname            : nickname.clone(),
            };
        let client_closed_signal = runtime_handle.spawn(handler.run(server_address, command_receiver));

        tracing::info!(?server_address, "new client created");
        Client{
            server_address,
            config: self.config,
            command_sender,
            client_event_sender,
            client_event_receiver,
            nickname,
            client_closed_signal,
            closed_by_self: AtomicBool::new(false),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
