//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::Arc;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Pause after a failed accept so persistent failures (e.g. fd exhaustion) don't spin the loop.
const ACCEPT_FAILURE_BACKOFF: Duration = Duration::from_millis(25);

//-------------------------------------------------------------------------------------------------------------------

/// Accepts connections forever, spawning one [`SessionHandler`] task per connection.
pub(crate) async fn run_acceptor(
    listener           : tokio::net::TcpListener,
    context            : Arc<SessionContext>,
    connection_counter : ConnectionCounter,
){
    let mut next_session_id: SessionId = 0;

    loop
    {
        let (stream, address) = match listener.accept().await
        {
            Ok(connection) => connection,
            Err(err) =>
            {
                tracing::warn!(?err, "failed to accept connection");
                tokio::time::sleep(ACCEPT_FAILURE_BACKOFF).await;
                continue;
            }
        };

        // reject connection if max connections reached
        if connection_counter.load() >= context.config.max_connections as u64
        {
            tracing::debug!(?address, "max connections reached, dropping connection...");
            continue;
        }

        if let Err(err) = stream.set_nodelay(true)
        { tracing::trace!(?err, ?address, "failed to set TCP_NODELAY"); }

        // the guard is taken before spawning so the count is updated asap
        next_session_id += 1;
        let connection_guard = connection_counter.track();
        tokio::spawn(SessionHandler::run(stream, address, next_session_id, context.clone(), connection_guard));
    }
}

//-------------------------------------------------------------------------------------------------------------------
