use crate::constants::DEFAULT_MAX_FRAME_SIZE;
use crate::frame::FrameDecodeError;
use bytes::BytesMut;
use rmpv::Value;

/// Incrementally assembles MessagePack frames from a byte stream.
///
/// Bytes may arrive in arbitrary chunks; `read_bytes` buffers them and yields
/// a value once a complete one is available. A truncated value is not an
/// error until the transport ends, but anything that is not MessagePack is.
///
/// The extent of the pending frame is tracked across calls, so every buffered
/// byte is examined once no matter how finely the frame is split. The value
/// itself is only built when the whole frame is present.
#[derive(Debug)]
pub struct FrameStreamDecoder {
    buffer: BytesMut,
    extent: FrameExtent,
    max_frame_size: usize,
}

impl Default for FrameStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStreamDecoder {
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            extent: FrameExtent::new(),
            max_frame_size,
        }
    }

    /// Appends `bytes` and attempts to decode the next complete frame.
    pub fn read_bytes(&mut self, bytes: &[u8]) -> Result<Option<Value>, FrameDecodeError> {
        self.buffer.extend_from_slice(bytes);
        self.next_frame()
    }

    /// Attempts to decode a frame from already-buffered bytes.
    pub fn next_frame(&mut self) -> Result<Option<Value>, FrameDecodeError> {
        let Some(frame_len) = self.extent.advance(&self.buffer)? else {
            if self.buffer.len() > self.max_frame_size {
                tracing::warn!(
                    "Discarding incomplete frame: {} bytes buffered, limit is {}",
                    self.buffer.len(),
                    self.max_frame_size
                );
                return Err(FrameDecodeError::FrameTooLarge {
                    limit: self.max_frame_size,
                });
            }
            return Ok(None);
        };

        self.extent = FrameExtent::new();
        let frame = self.buffer.split_to(frame_len);

        let mut slice: &[u8] = &frame;
        rmpv::decode::read_value(&mut slice)
            .map(Some)
            .map_err(|e| FrameDecodeError::CorruptFrame(e.to_string()))
    }

    /// Number of bytes buffered but not yet part of a decoded frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

/// How far the buffer has been walked towards the end of the next frame.
#[derive(Debug, Clone, Copy)]
struct FrameExtent {
    /// Offset of the first element not yet known to be complete.
    scanned: usize,
    /// Elements, nested ones included, still needed to finish the frame.
    pending: u64,
}

impl FrameExtent {
    const fn new() -> Self {
        Self {
            scanned: 0,
            pending: 1,
        }
    }

    /// Steps over every element of `buf` that is fully buffered. Returns the
    /// frame length once the outermost value is complete.
    fn advance(&mut self, buf: &[u8]) -> Result<Option<usize>, FrameDecodeError> {
        while self.pending > 0 {
            let Some(element) = Element::at(&buf[self.scanned..])? else {
                return Ok(None);
            };
            self.scanned += element.len;
            self.pending = (self.pending - 1).saturating_add(element.children);
        }

        Ok(Some(self.scanned))
    }
}

/// The encoded size of one MessagePack element, excluding its children.
#[derive(Debug, Clone, Copy)]
struct Element {
    len: usize,
    children: u64,
}

impl Element {
    const fn scalar(len: usize) -> Self {
        Self { len, children: 0 }
    }

    const fn container(len: usize, children: u64) -> Self {
        Self { len, children }
    }

    /// Sizes the element starting at `bytes[0]`, or `None` if its header or
    /// scalar body is not fully buffered yet.
    fn at(bytes: &[u8]) -> Result<Option<Self>, FrameDecodeError> {
        let Some(&marker) = bytes.first() else {
            return Ok(None);
        };

        let element = match marker {
            0x00..=0x7f | 0xc0 | 0xc2 | 0xc3 | 0xe0..=0xff => Self::scalar(1),
            0x80..=0x8f => Self::container(1, 2 * u64::from(marker & 0x0f)),
            0x90..=0x9f => Self::container(1, u64::from(marker & 0x0f)),
            0xa0..=0xbf => Self::scalar(1 + usize::from(marker & 0x1f)),
            0xcc | 0xd0 => Self::scalar(2),
            0xcd | 0xd1 => Self::scalar(3),
            0xd4 => Self::scalar(3),
            0xd5 => Self::scalar(4),
            0xca | 0xce | 0xd2 => Self::scalar(5),
            0xd6 => Self::scalar(6),
            0xcb | 0xcf | 0xd3 => Self::scalar(9),
            0xd7 => Self::scalar(10),
            0xd8 => Self::scalar(18),
            // bin8/16/32, str8/16/32, ext8/16/32 (ext adds a type byte)
            0xc4 | 0xd9 => return Ok(Self::sized(bytes, 1, 0)),
            0xc5 | 0xda => return Ok(Self::sized(bytes, 2, 0)),
            0xc6 | 0xdb => return Ok(Self::sized(bytes, 4, 0)),
            0xc7 => return Ok(Self::sized(bytes, 1, 1)),
            0xc8 => return Ok(Self::sized(bytes, 2, 1)),
            0xc9 => return Ok(Self::sized(bytes, 4, 1)),
            // array16/32, map16/32
            0xdc => return Ok(Self::counted(bytes, 2, 1)),
            0xdd => return Ok(Self::counted(bytes, 4, 1)),
            0xde => return Ok(Self::counted(bytes, 2, 2)),
            0xdf => return Ok(Self::counted(bytes, 4, 2)),
            0xc1 => {
                return Err(FrameDecodeError::CorruptFrame(
                    "reserved marker 0xc1".to_string(),
                ));
            }
        };

        Ok((bytes.len() >= element.len).then_some(element))
    }

    /// A length-prefixed body that must be fully buffered.
    fn sized(bytes: &[u8], width: usize, extra: usize) -> Option<Self> {
        let body = usize::try_from(length_prefix(bytes, width)?).ok()?;
        let len = (1 + width + extra).checked_add(body)?;
        (bytes.len() >= len).then_some(Self::scalar(len))
    }

    /// A count-prefixed container; its entries are scanned as children.
    fn counted(bytes: &[u8], width: usize, per_entry: u64) -> Option<Self> {
        let count = length_prefix(bytes, width)?;
        Some(Self::container(1 + width, count * per_entry))
    }
}

/// Reads the big-endian integer of `width` bytes that follows the marker.
fn length_prefix(bytes: &[u8], width: usize) -> Option<u64> {
    let prefix = bytes.get(1..1 + width)?;
    Some(prefix.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}
