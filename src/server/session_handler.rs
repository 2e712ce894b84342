//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

//standard shortcuts
use core::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// State shared by every session of one server.
#[derive(Debug)]
pub(crate) struct SessionContext
{
    pub(crate) router: Router,
    pub(crate) config: ServerConfig,
    /// reports flow to the server owner
    pub(crate) report_sender: crossbeam::channel::Sender<ServerReport>,
}

impl SessionContext
{
    pub(crate) fn report(&self, report: ServerReport)
    {
        if let Err(err) = self.report_sender.send(report)
        {
            tracing::trace!(?err, "dropping server report, the server owner is gone");
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

/// Drains a session's outbound queue onto the socket.
///
/// Ends when every [`SessionHandle`] for the session is dropped, or when the socket fails.
async fn write_loop(
    id           : SessionId,
    mut writer   : OwnedWriteHalf,
    mut outbound : mpsc::Receiver<Envelope>,
    max_msg_size : u32,
){
    while let Some(envelope) = outbound.recv().await
    {
        let frame = match encode_envelope(&envelope, max_msg_size)
        {
            Ok(frame) => frame,
            Err(err) =>
            {
                tracing::warn!(session_id = id, ?err, "dropping envelope that failed to encode");
                continue;
            }
        };

        if let Err(err) = write_frame(&mut writer, &frame).await
        {
            tracing::debug!(session_id = id, ?err, "writing to session failed, stopping writer");
            return;
        }
    }

    if let Err(err) = writer.shutdown().await
    { tracing::trace!(session_id = id, ?err, "failed shutting down session writer"); }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

/// Server side of one client connection.
///
/// The reader (this handler) and the writer task share nothing but the session's outbound queue.
#[derive(Debug)]
pub(crate) struct SessionHandler
{
    id: SessionId,
    /// sending side of this session (replies go through the same queue as broadcasts)
    handle: SessionHandle,
    state: SessionState,
    rate_limit_tracker: RateLimitTracker,
    context: Arc<SessionContext>,
    /// keeps this connection counted until the session is torn down
    connection_guard: ConnectionGuard,
}

impl SessionHandler
{
    /// Run a session from accept to teardown.
    pub(crate) async fn run(
        stream           : TcpStream,
        address          : SocketAddr,
        id               : SessionId,
        context          : Arc<SessionContext>,
        connection_guard : ConnectionGuard,
    ){
        tracing::info!(session_id = id, ?address, "session connected");
        context.report(ServerReport::Connected(id, address));

        let (mut reader, writer) = stream.into_split();
        let (handle, receivers) = SessionHandle::new(id, context.config.outbound_queue_size);
        let SessionReceivers{ outbound, mut control } = receivers;
        let mut writer_task = tokio::spawn(write_loop(id, writer, outbound, context.config.max_msg_size));

        let mut handler = SessionHandler{
                id,
                handle,
                state: SessionState::Connected,
                rate_limit_tracker: RateLimitTracker::new(context.config.rate_limit_config),
                context,
                connection_guard,
            };

        let (reason, writer_done) = handler.read_loop(&mut reader, &mut control, &mut writer_task).await;
        handler.teardown(reason, writer_task, writer_done).await;
    }

    /// Read and route envelopes until the session must close.
    /// - Returns the close reason, and whether the writer task already finished.
    async fn read_loop(
        &mut self,
        reader  : &mut OwnedReadHalf,
        control : &mut mpsc::UnboundedReceiver<SessionCommand>,
        writer  : &mut JoinHandle<()>,
    ) -> (String, bool)
    {
        let max_msg_size = self.context.config.max_msg_size;

        loop
        {
            let envelope = tokio::select!{
                command = control.recv() => match command
                {
                    Some(SessionCommand::Close(reason)) => return (reason, false),
                    None => return (String::from("control channel closed"), false),
                },
                _ = &mut *writer => return (String::from("writer stopped"), true),
                frame = read_envelope(&mut *reader, max_msg_size) => match frame
                {
                    Ok(Some(envelope)) => envelope,
                    Ok(None) => return (String::from("connection closed by peer"), false),
                    Err(err) => return (format!("read failure: {}", err), false),
                },
            };

            // a close request must not wait on a slow store
            // note: routing only changes session state after its last store call, so dropping it midway is safe
            let dispatch = tokio::select!{
                command = control.recv() => match command
                {
                    Some(SessionCommand::Close(reason)) => return (reason, false),
                    None => return (String::from("control channel closed"), false),
                },
                _ = &mut *writer => return (String::from("writer stopped"), true),
                dispatch = self.on_envelope(envelope) => dispatch,
            };

            if let Dispatch::Close(reason) = dispatch
            {
                return (reason, false);
            }
        }
    }

    /// Handle one inbound envelope.
    async fn on_envelope(&mut self, envelope: Envelope) -> Dispatch
    {
        tracing::trace!(session_id = self.id, kind = ?envelope.kind, "received envelope");

        if !self.rate_limit_tracker.try_count_msg()
        {
            tracing::trace!(session_id = self.id, "client envelopes exceeded rate limit, closing session...");
            return Dispatch::Close(String::from("rate limit violation"));
        }

        let was_authenticated = self.state.nickname().is_some();
        let dispatch = self.context.router.dispatch(&mut self.state, &self.handle, envelope).await;

        if !was_authenticated
        {
            if let Some(nickname) = self.state.nickname()
            {
                self.context.report(ServerReport::Authenticated(self.id, String::from(nickname)));
            }
        }

        dispatch
    }

    /// Unregister the session and release its connection.
    async fn teardown(self, reason: String, mut writer: JoinHandle<()>, writer_done: bool)
    {
        tracing::info!(session_id = self.id, reason, "closing session");

        let SessionHandler{ id, handle, state, context, connection_guard, .. } = self;

        // unregister
        if let Some(nickname) = state.nickname()
        {
            if context.router.registry().remove(nickname, id)
            { tracing::info!(session_id = id, nickname, "user offline"); }
        }

        // let the writer flush what is queued, then cut it off
        drop(handle);
        if !writer_done
        {
            if tokio::time::timeout(context.config.close_linger, &mut writer).await.is_err()
            {
                tracing::debug!(session_id = id, "session writer did not finish in time, aborting");
                writer.abort();
            }
        }

        drop(connection_guard);
        context.report(ServerReport::Disconnected(id));
    }
}

//-------------------------------------------------------------------------------------------------------------------
