//local shortcuts

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by the [`Client`](crate::Client).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClientError
{
    /// The client was closed or its connection died.
    Closed,
    /// The envelope is too large for the client's configured message size.
    Oversized,
}

impl std::fmt::Display for ClientError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "ClientError::");
        match self
        {
            ClientError::Closed    => write!(f, "Closed"),
            ClientError::Oversized => write!(f, "Oversized"),
        }
    }
}
impl std::error::Error for ClientError {}

//-------------------------------------------------------------------------------------------------------------------
