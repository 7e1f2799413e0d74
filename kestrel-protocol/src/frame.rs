//! Length-prefixed framing.
//!
//! Frame: int32 (BE) length + payload. The length never includes itself.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, Result};

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Default upper bound on a single frame payload.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 100 * 1024 * 1024;

/// Initial payload buffer size; larger payloads grow the buffer as they arrive.
const PAYLOAD_CHUNK: usize = 64 * 1024;

/// Read one frame and return its payload.
///
/// Returns `Ok(None)` if the stream ends before the first byte of a new frame.
/// Ending anywhere after that is an `IncompleteFrame`.
pub async fn read_frame<R>(reader: &mut R, max_frame_bytes: usize) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; FRAME_HEADER_LEN];
    let received = read_until_full(reader, &mut len_buf).await?;
    if received == 0 {
        return Ok(None);
    }
    if received < FRAME_HEADER_LEN {
        return Err(ProtocolError::IncompleteFrame {
            expected: FRAME_HEADER_LEN,
            received,
        });
    }

    let len = i32::from_be_bytes(len_buf);
    if len < 0 {
        return Err(ProtocolError::InvalidFrameLength(len));
    }
    let len = len as usize;
    if len > max_frame_bytes {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: max_frame_bytes,
        });
    }

    // Grows as bytes arrive; a declared length alone never reserves `len` bytes.
    let mut payload = Vec::with_capacity(len.min(PAYLOAD_CHUNK));
    let received = (&mut *reader)
        .take(len as u64)
        .read_to_end(&mut payload)
        .await?;
    if received < len {
        return Err(ProtocolError::IncompleteFrame {
            expected: len,
            received,
        });
    }

    Ok(Some(Bytes::from(payload)))
}

/// Write `payload` as one frame and flush.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let framed = encode_frame(payload)?;
    writer.write_all(&framed).await?;
    writer.flush().await?;
    Ok(())
}

/// Prefix `payload` with its big-endian length.
pub fn encode_frame(payload: &[u8]) -> Result<BytesMut> {
    let len = i32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
        size: payload.len(),
        max: i32::MAX as usize,
    })?;
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + payload.len());
    buf.put_i32(len);
    buf.put_slice(payload);
    Ok(buf)
}

/// Fill `buf` from `reader`, tolerating partial reads. Returns how many bytes
/// were read, which is less than `buf.len()` only if the stream ended.
async fn read_until_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
