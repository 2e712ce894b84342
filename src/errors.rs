//local shortcuts

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted while reading or writing envelope frames.
#[derive(Debug)]
pub enum FrameError
{
    /// The underlying stream failed.
    Io(std::io::Error),
    /// A frame's declared or encoded size exceeds the configured limit.
    Oversized(u64),
    /// A frame's payload is not a valid envelope.
    Decode,
    /// An envelope could not be encoded.
    Encode,
}

impl std::fmt::Display for FrameError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "FrameError::");
        match self
        {
            FrameError::Io(err)         => write!(f, "Io({})", err),
            FrameError::Oversized(size) => write!(f, "Oversized({})", size),
            FrameError::Decode          => write!(f, "Decode"),
            FrameError::Encode          => write!(f, "Encode"),
        }
    }
}

impl std::error::Error for FrameError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self
        {
            FrameError::Io(err) => Some(err),
            _                   => None,
        }
    }
}

impl From<std::io::Error> for FrameError
{
    fn from(err: std::io::Error) -> Self { FrameError::Io(err) }
}

//-------------------------------------------------------------------------------------------------------------------
