use crate::constants::DEFAULT_READ_CHUNK_SIZE;
use crate::frame::FrameStreamDecoder;
use rmpv::Value;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads from `reader` until `decoder` yields one complete frame.
///
/// The transport ending before a frame completes is reported as
/// `UnexpectedEof`; malformed bytes are reported as `InvalidData` carrying
/// the underlying `FrameDecodeError`.
pub async fn read_frame<R>(reader: &mut R, decoder: &mut FrameStreamDecoder) -> io::Result<Value>
where
    R: AsyncRead + Unpin,
{
    if let Some(value) = decoder
        .next_frame()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
    {
        return Ok(value);
    }

    let mut chunk = vec![0u8; DEFAULT_READ_CHUNK_SIZE];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "connection closed with {} bytes of an incomplete frame",
                    decoder.buffered_len()
                ),
            ));
        }

        if let Some(value) = decoder
            .read_bytes(&chunk[..n])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        {
            return Ok(value);
        }
    }
}
