//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// What to do when a user logs in while their nickname is already registered by another session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DuplicateLoginPolicy
{
    /// Refuse the new login with [`EnvelopeKind::LoginFail`]. The existing session is untouched.
    #[default]
    Reject,
    /// Close the existing session and register the new one in its place.
    ReplaceExisting,
}

//-------------------------------------------------------------------------------------------------------------------

/// Config for the [`Server`].
#[derive(Debug, Copy, Clone)]
pub struct ServerConfig
{
    /// Max number of concurrent client connections (authenticated or not). Defaults to 10K.
    ///
    /// Connections beyond the limit are dropped right after they are accepted.
    pub max_connections: u32,
    /// Max envelope size allowed in either direction (in bytes, excluding the frame header). Defaults to 64KB.
    pub max_msg_size: u32,
    /// Capacity of each session's outbound queue. Defaults to 256 envelopes.
    ///
    /// A session whose queue is full when a new envelope arrives is treated as a slow peer and disconnected.
    pub outbound_queue_size: usize,
    /// Capacity of the server's chat history queue. Defaults to 1024 entries.
    ///
    /// History is appended by a single writer task in broadcast order. Entries that arrive while the queue is
    /// full are dropped with a warning; the chat itself is still relayed.
    pub chat_log_queue_size: usize,
    /// How long a closing session's writer may keep flushing queued envelopes before it is aborted.
    /// Defaults to 250 milliseconds.
    pub close_linger: Duration,
    /// Rate limit for envelopes received from a session. See [`RateLimitConfig`] for defaults.
    pub rate_limit_config: RateLimitConfig,
    /// Policy for logins under a nickname that is already online. Defaults to [`DuplicateLoginPolicy::Reject`].
    pub duplicate_login: DuplicateLoginPolicy,
}

impl Default for ServerConfig
{
    fn default() -> ServerConfig
    {
        ServerConfig{
                max_connections     : 10_000u32,
                max_msg_size        : 64_000u32,
                outbound_queue_size : 256usize,
                chat_log_queue_size : 1024usize,
                close_linger        : Duration::from_millis(250),
                rate_limit_config   : RateLimitConfig::default(),
                duplicate_login     : DuplicateLoginPolicy::default(),
            }
    }
}

//-------------------------------------------------------------------------------------------------------------------
