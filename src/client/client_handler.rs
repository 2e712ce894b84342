//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;

//standard shortcuts
use core::fmt::Debug;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

/// Command from a [`Client`] to its backend.
#[derive(Debug)]
pub(crate) enum ClientCommand
{
    Send(Envelope),
    Close,
}

//-------------------------------------------------------------------------------------------------------------------

/// Backend of a [`Client`]: owns the connection and turns server frames into client events.
#[derive(Debug)]
pub(crate) struct ClientHandler
{
    pub(crate) config: ClientConfig,
    /// send client events to the client
    pub(crate) client_event_sender: crossbeam::channel::Sender<ClientEvent>,
    /// nickname learned from the server's login reply
    pub(crate) nickname: Arc<Mutex<Option<String>>>,
}

impl ClientHandler
{
    /// Connect, then pump frames in both directions until either side stops.
    ///
    /// Commands sent before the connection is established are queued and flushed once it is.
    pub(crate) async fn run(self, address: SocketAddr, mut commands: mpsc::UnboundedReceiver<ClientCommand>)
    {
        let stream = match tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(address)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) =>
            {
                tracing::warn!(?err, ?address, "failed to connect");
                self.finish(false);
                return;
            }
            Err(_) =>
            {
                tracing::warn!(?address, "timed out connecting");
                self.finish(false);
                return;
            }
        };
        if let Err(err) = stream.set_nodelay(true)
        { tracing::trace!(?err, "failed to set TCP_NODELAY"); }

        tracing::info!(?address, "connected");
        self.forward(ClientEvent::Report(ClientReport::Connected));

        let (mut reader, mut writer) = stream.into_split();
        let closed_by_self = tokio::select!{
            _ = self.read_loop(&mut reader) => false,
            closed_by_self = Self::write_loop(&mut writer, &mut commands, self.config.max_msg_size) => closed_by_self,
        };

        self.finish(closed_by_self);
    }

    /// Forward server envelopes until the connection ends.
    async fn read_loop(&self, reader: &mut OwnedReadHalf)
    {
        loop
        {
            let envelope = match read_envelope(&mut *reader, self.config.max_msg_size).await
            {
                Ok(Some(envelope)) => envelope,
                Ok(None) => { tracing::info!("server closed the connection"); return; }
                Err(err) => { tracing::warn!(?err, "failed reading from server"); return; }
            };
            tracing::trace!(kind = ?envelope.kind, "received envelope from server");

            if envelope.kind == EnvelopeKind::LoginOk
            {
                self.set_nickname(envelope.receiver.clone());
            }

            self.forward(ClientEvent::Msg(envelope));
        }
    }

    /// Write queued envelopes until closed.
    /// - Returns `true` if the client closed itself (or was dropped).
    async fn write_loop(
        writer       : &mut OwnedWriteHalf,
        commands     : &mut mpsc::UnboundedReceiver<ClientCommand>,
        max_msg_size : u32,
    ) -> bool
    {
        while let Some(command) = commands.recv().await
        {
            match command
            {
                ClientCommand::Send(envelope) =>
                {
                    if let Err(err) = write_envelope(&mut *writer, &envelope, max_msg_size).await
                    {
                        tracing::warn!(?err, "failed sending envelope to server");
                        return false;
                    }
                }
                ClientCommand::Close => break,
            }
        }

        if let Err(err) = writer.shutdown().await
        { tracing::trace!(?err, "failed shutting down client writer"); }
        true
    }

    fn set_nickname(&self, nickname: Option<String>)
    {
        let Some(nickname) = nickname else { tracing::warn!("login reply is missing the nickname"); return; };
        let Ok(mut slot) = self.nickname.lock() else { tracing::error!("client nickname lock poisoned"); return; };
        *slot = Some(nickname);
    }

    fn forward(&self, event: ClientEvent)
    {
        if let Err(err) = self.client_event_sender.send(event)
        {
            tracing::debug!(?err, "failed to forward event to client");
        }
    }

    fn finish(&self, closed_by_self: bool)
    {
        if !closed_by_self { self.forward(ClientEvent::Report(ClientReport::Disconnected)); }
        self.forward(ClientEvent::Report(ClientReport::IsDead));
    }
}

//-------------------------------------------------------------------------------------------------------------------
