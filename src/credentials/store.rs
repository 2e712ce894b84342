//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Avatar id assigned to new accounts.
pub const DEFAULT_AVATAR: i64 = 1;

//-------------------------------------------------------------------------------------------------------------------

/// An account as stored by a [`CredentialStore`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserRecord
{
    pub id: i64,
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub avatar: i64,
}

//-------------------------------------------------------------------------------------------------------------------

/// One line of chat history.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChatLogEntry
{
    pub sender: String,
    pub content: String,
    /// Target nickname or [`BROADCAST_RECEIVER`].
    pub receiver: String,
}

impl ChatLogEntry
{
    /// Make a log entry from a chat envelope. The receiver defaults to [`BROADCAST_RECEIVER`].
    pub fn from_envelope(envelope: &Envelope) -> Self
    {
        Self{
            sender   : envelope.sender.clone(),
            content  : envelope.content.clone(),
            receiver : String::from(envelope.receiver_or_broadcast()),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Persistence for accounts and chat history.
///
/// The relay calls this from session tasks; implementations may block on external I/O. Errors are translated
/// into protocol replies by the router and never cross the wire.
#[async_trait::async_trait]
pub trait CredentialStore: Debug + Send + Sync + 'static
{
    /// Check a username/password pair. Returns the account's nickname.
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;

    /// Create an account. Usernames are unique.
    async fn register(&self, username: &str, password: &str, nickname: &str) -> Result<(), RegisterError>;

    /// Append a chat line to the history.
    async fn log_chat(&self, entry: ChatLogEntry) -> Result<(), StoreError>;
}

//-------------------------------------------------------------------------------------------------------------------
