//local shortcuts

//third-party shortcuts
use serde::{Serialize, Deserialize};

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Receiver sentinel meaning 'every online user'.
pub const BROADCAST_RECEIVER: &str = "all";

/// Separator used to pack credentials into [`Envelope`] content.
pub const CREDENTIAL_SEPARATOR: char = '|';

//-------------------------------------------------------------------------------------------------------------------

/// Id for connections on the server. Unique for the lifetime of a server.
pub type SessionId = u64;

//-------------------------------------------------------------------------------------------------------------------

/// The kind of an [`Envelope`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EnvelopeKind
{
    /// Client asks to log in. Content: `username|password`.
    Login,
    /// Login succeeded. Content: greeting. Receiver: the session's nickname.
    LoginOk,
    /// Login failed. Content: reason.
    LoginFail,
    /// Client asks to create an account. Content: `username|password|nickname`.
    Register,
    /// Registration succeeded.
    RegisterOk,
    /// Registration failed. Content: reason.
    RegisterFail,
    /// A chat message for the global room.
    Chat,
    /// The relay refused an envelope because of the session's state. Content: reason.
    Rejected,
}

impl EnvelopeKind
{
    /// Returns `true` for kinds that only the relay may send.
    pub fn is_server_only(self) -> bool
    {
        match self
        {
            Self::Login    |
            Self::Register |
            Self::Chat => false,
            Self::LoginOk      |
            Self::LoginFail    |
            Self::RegisterOk   |
            Self::RegisterFail |
            Self::Rejected => true,
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// One discrete protocol message exchanged between a client and the relay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Envelope
{
    /// What this envelope means.
    pub kind: EnvelopeKind,
    /// Nickname of the sender. Empty for requests from unauthenticated clients and for relay replies.
    pub sender: String,
    /// Free-form payload.
    pub content: String,
    /// Target nickname, or [`BROADCAST_RECEIVER`].
    pub receiver: Option<String>,
}

impl Envelope
{
    /// Make a new envelope with no receiver.
    pub fn new(kind: EnvelopeKind, sender: impl Into<String>, content: impl Into<String>) -> Self
    {
        Self{ kind, sender: sender.into(), content: content.into(), receiver: None }
    }

    /// Make a relay reply (empty sender).
    pub fn reply(kind: EnvelopeKind, content: impl Into<String>) -> Self
    {
        Self::new(kind, String::default(), content)
    }

    /// Make a login request.
    pub fn login(username: &str, password: &str) -> Self
    {
        Self::new(EnvelopeKind::Login, String::default(), format!("{}{}{}", username, CREDENTIAL_SEPARATOR, password))
    }

    /// Make a registration request.
    pub fn register(username: &str, password: &str, nickname: &str) -> Self
    {
        let content = format!("{}{sep}{}{sep}{}", username, password, nickname, sep = CREDENTIAL_SEPARATOR);
        Self::new(EnvelopeKind::Register, String::default(), content)
    }

    /// Make a chat message addressed to everyone.
    pub fn chat(sender: impl Into<String>, content: impl Into<String>) -> Self
    {
        Self::new(EnvelopeKind::Chat, sender, content).with_receiver(BROADCAST_RECEIVER)
    }

    /// Set the receiver.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self
    {
        self.receiver = Some(receiver.into());
        self
    }

    /// The receiver, defaulting to [`BROADCAST_RECEIVER`] when absent.
    pub fn receiver_or_broadcast(&self) -> &str
    {
        self.receiver.as_deref().unwrap_or(BROADCAST_RECEIVER)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Credentials unpacked from a [`EnvelopeKind::Login`] envelope.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoginCredentials
{
    pub username: String,
    pub password: String,
}

/// Credentials unpacked from a [`EnvelopeKind::Register`] envelope.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RegisterCredentials
{
    pub username: String,
    pub password: String,
    pub nickname: String,
}

fn split_credentials<const N: usize>(content: &str) -> Option<[String; N]>
{
    let parts: Vec<&str> = content.split(CREDENTIAL_SEPARATOR).collect();
    if parts.len() != N { return None; }
    if parts.iter().any(|part| part.is_empty()) { return None; }

    let mut fields: [String; N] = std::array::from_fn(|_| String::default());
    for (field, part) in fields.iter_mut().zip(parts)
    {
        *field = String::from(part);
    }
    Some(fields)
}

/// Unpack `username|password`.
///
/// Returns `None` if the field count is wrong or a field is empty.
pub fn parse_login_content(content: &str) -> Option<LoginCredentials>
{
    let [username, password] = split_credentials::<2>(content)?;
    Some(LoginCredentials{ username, password })
}

/// Unpack `username|password|nickname`.
///
/// Returns `None` if the field count is wrong or a field is empty.
pub fn parse_register_content(content: &str) -> Option<RegisterCredentials>
{
    let [username, password, nickname] = split_credentials::<3>(content)?;
    Some(RegisterCredentials{ username, password, nickname })
}

//-------------------------------------------------------------------------------------------------------------------
