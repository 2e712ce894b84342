//local shortcuts

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Config for the [`Client`](crate::Client).
#[derive(Debug, Copy, Clone)]
pub struct ClientConfig
{
    /// Max envelope size in either direction (in bytes). Should match the server. Defaults to 64KB.
    pub max_msg_size: u32,
    /// How long to wait for the TCP connection to be established. Defaults to 5 seconds.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig
{
    fn default() -> ClientConfig
    {
        ClientConfig{
                max_msg_size    : 64_000u32,
                connect_timeout : Duration::from_secs(5),
            }
    }
}

//-------------------------------------------------------------------------------------------------------------------
