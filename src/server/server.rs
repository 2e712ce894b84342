//local shortcuts
use crate::*;

//third-party shortcuts
use enfync::Handle;

//standard shortcuts
use core::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// A chat relay server.
///
/// Use a [`ServerFactory`] to produce a new server.
///
/// Sessions are served on the runtime passed to the factory; this type only observes them. Note that the server does
/// not currently have a shut-down procedure other than closing the executable.
#[derive(Debug)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::system::Resource))]
pub struct Server
{
    /// the server's address
    server_address: SocketAddr,
    /// online users
    registry: SessionRegistry,
    /// number of current connections
    connection_counter: ConnectionCounter,
    /// receives session lifecycle reports
    report_receiver: crossbeam::channel::Receiver<ServerReport>,
    /// signal indicates if the acceptor has stopped
    server_running_signal: enfync::PendingResult<()>,
}

impl Server
{
    /// Get the server's address.
    pub fn address(&self) -> SocketAddr
    {
        self.server_address
    }

    /// Get number of connections (authenticated or not).
    pub fn num_connections(&self) -> u64
    {
        self.connection_counter.load()
    }

    /// Get number of online (authenticated) users.
    pub fn num_online(&self) -> usize
    {
        self.registry.len()
    }

    /// Nicknames of online users, sorted.
    pub fn online_nicknames(&self) -> Vec<String>
    {
        self.registry.nicknames()
    }

    /// Test if a nickname is online.
    pub fn is_online(&self, nickname: &str) -> bool
    {
        self.registry.contains(nickname)
    }

    /// Close the session registered under `nickname`.
    /// - Returns `false` if the nickname is not online.
    ///
    /// The session may remain registered until some time after this method is called.
    pub fn close_session(&self, nickname: &str) -> bool
    {
        let Some(session) = self.registry.get(nickname)
        else { tracing::debug!(nickname, "tried to close session of offline user"); return false; };

        tracing::info!(nickname, session_id = session.id(), "closing session");
        session.close("closed by server");
        true
    }

    /// Try to get the next available session report.
    pub fn next_report(&self) -> Option<ServerReport>
    {
        self.report_receiver.try_recv().ok()
    }

    /// Test if the server is dead.
    pub fn is_dead(&self) -> bool
    {
        self.server_running_signal.done()
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Factory for producing servers that share one credential store.
#[derive(Debug, Clone)]
pub struct ServerFactory
{
    store: Arc<dyn CredentialStore>,
}

impl ServerFactory
{
    /// Make a new server factory.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self
    {
        ServerFactory{ store }
    }

    /// Make a new server listening on `address`.
    ///
    /// Binding happens before this returns, so `"127.0.0.1:0"` can be used and the chosen port read back with
    /// [`Server::address()`]. Returns [`RelayError::Bind`] if the endpoint can't be bound.
    pub fn new_server<A>(&self,
        runtime_handle : enfync::builtin::native::TokioHandle,
        address        : A,
        config         : ServerConfig,
    ) -> Result<Server, RelayError>
    where
        A: std::net::ToSocketAddrs,
    {
        // prepare listener
        let listener = std::net::TcpListener::bind(address).map_err(RelayError::Bind)?;
        listener.set_nonblocking(true).map_err(RelayError::Bind)?;
        let server_address = listener.local_addr().map_err(RelayError::Bind)?;

        // prepare shared session state
        let (report_sender, report_receiver) = crossbeam::channel::unbounded::<ServerReport>();
        let registry = SessionRegistry::new();
        let connection_counter = ConnectionCounter::default();
        let (chat_log, chat_log_writer) = chat_log_channel(self.store.clone(), config.chat_log_queue_size);
        let context = Arc::new(SessionContext{
                router: Router::new(registry.clone(), self.store.clone(), chat_log, config.duplicate_login),
                config,
                report_sender,
            });

        // launch the chat history writer
        // note: it stops once the acceptor and all sessions have dropped their routers
        let _ = runtime_handle.spawn(chat_log_writer.run());

        // launch the acceptor
        // note: the tokio listener must be created from within the runtime
        let connection_counter_clone = connection_counter.clone();
        let server_running_signal = runtime_handle.spawn(
                async move {
                    let listener = match tokio::net::TcpListener::from_std(listener)
                    {
                        Ok(listener) => listener,
                        Err(err) => { tracing::error!(?err, "failed to register listener with runtime"); return; }
                    };
                    run_acceptor(listener, context, connection_counter_clone).await;
                }
            );

        tracing::info!(?server_address, "new server created");
        Ok(Server{
                server_address,
                registry,
                connection_counter,
                report_receiver,
                server_running_signal,
            })
    }
}

//-------------------------------------------------------------------------------------------------------------------
