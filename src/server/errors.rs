//local shortcuts

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Fatal errors emitted when starting a [`Server`](crate::Server).
#[derive(Debug)]
pub enum RelayError
{
    /// The listening endpoint could not be bound.
    Bind(std::io::Error),
}

impl std::fmt::Display for RelayError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "RelayError::");
        match self
        {
            RelayError::Bind(err) => write!(f, "Bind({})", err),
        }
    }
}

impl std::error::Error for RelayError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self
        {
            RelayError::Bind(err) => Some(err),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by the [`SessionRegistry`](crate::SessionRegistry).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RegistryError
{
    /// The nickname is owned by another live session.
    NicknameTaken(String),
}

impl std::fmt::Display for RegistryError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "RegistryError::");
        match self
        {
            RegistryError::NicknameTaken(nickname) => write!(f, "NicknameTaken({})", nickname),
        }
    }
}
impl std::error::Error for RegistryError {}

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted when enqueuing an envelope for a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeliveryError
{
    /// The session's outbound queue is full.
    QueueFull,
    /// The session's writer is gone.
    SessionClosed,
}

impl std::fmt::Display for DeliveryError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "DeliveryError::");
        match self
        {
            DeliveryError::QueueFull     => write!(f, "QueueFull"),
            DeliveryError::SessionClosed => write!(f, "SessionClosed"),
        }
    }
}
impl std::error::Error for DeliveryError {}

//-------------------------------------------------------------------------------------------------------------------
