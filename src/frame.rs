//local shortcuts
use crate::*;

//third-party shortcuts
use bincode::Options;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

/// Number of bytes in a frame's length prefix.
pub const FRAME_HEADER_BYTES: usize = 4;

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn map_bincode_error(err: bincode::Error, limit: u32, fallback: FrameError) -> FrameError
{
    match *err
    {
        bincode::ErrorKind::SizeLimit => FrameError::Oversized(limit as u64 + 1),
        _ => fallback,
    }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

/// Encode an envelope as one frame: a big-endian `u32` payload length followed by the bincode payload.
///
/// Fails with [`FrameError::Oversized`] if the payload would exceed `max_msg_size` bytes.
pub fn encode_envelope(envelope: &Envelope, max_msg_size: u32) -> Result<Vec<u8>, FrameError>
{
    let payload = bincode::DefaultOptions::new()
        .with_limit(max_msg_size as u64)
        .serialize(envelope)
        .map_err(|err| map_bincode_error(err, max_msg_size, FrameError::Encode))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_BYTES + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

//-------------------------------------------------------------------------------------------------------------------

/// Decode a frame payload (without the length prefix).
pub fn decode_envelope(payload: &[u8], max_msg_size: u32) -> Result<Envelope, FrameError>
{
    bincode::DefaultOptions::new()
        .with_limit(max_msg_size as u64)
        .deserialize(payload)
        .map_err(|err| map_bincode_error(err, max_msg_size, FrameError::Decode))
}

//-------------------------------------------------------------------------------------------------------------------

/// Read the next envelope from a stream.
///
/// Returns `Ok(None)` if the stream ends before a new frame starts. Frames that declare a payload larger than
/// `max_msg_size` are rejected without reading the payload.
///
/// Not cancel-safe: dropping the future mid-frame leaves the stream at an unknown offset.
pub async fn read_envelope<R>(reader: &mut R, max_msg_size: u32) -> Result<Option<Envelope>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FRAME_HEADER_BYTES];
    match reader.read_exact(&mut header).await
    {
        Ok(_) => (),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(FrameError::Io(err)),
    }

    let payload_len = u32::from_be_bytes(header);
    if payload_len > max_msg_size { return Err(FrameError::Oversized(payload_len as u64)); }

    let mut payload = vec![0u8; payload_len as usize];
    reader.read_exact(&mut payload).await?;

    decode_envelope(&payload, max_msg_size).map(Some)
}

//-------------------------------------------------------------------------------------------------------------------

/// Write an already-encoded frame and flush it.
pub async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await?;
    Ok(())
}

//-------------------------------------------------------------------------------------------------------------------

/// Encode an envelope and write it as one frame.
pub async fn write_envelope<W>(writer: &mut W, envelope: &Envelope, max_msg_size: u32) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_envelope(envelope, max_msg_size)?;
    write_frame(writer, &frame).await
}

//-------------------------------------------------------------------------------------------------------------------
