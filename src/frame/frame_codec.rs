use crate::frame::{FrameDecodeError, FrameEncodeError};
use rmpv::Value;

/// Converts between MessagePack bytes and the dynamic `rmpv::Value`
/// representation that all frames pass through.
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes a single value into a fresh byte buffer.
    pub fn encode(value: &Value) -> Result<Vec<u8>, FrameEncodeError> {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, value)
            .map_err(|e| FrameEncodeError::Write(e.to_string()))?;
        Ok(buf)
    }

    /// Decodes exactly one value from `bytes`.
    ///
    /// Trailing bytes after the first value are rejected; a frame buffer is
    /// expected to hold one frame and nothing else.
    pub fn decode(bytes: &[u8]) -> Result<Value, FrameDecodeError> {
        let mut slice = bytes;
        let value = rmpv::decode::read_value(&mut slice)
            .map_err(|e| FrameDecodeError::CorruptFrame(e.to_string()))?;

        if !slice.is_empty() {
            return Err(FrameDecodeError::CorruptFrame(format!(
                "{} trailing bytes after frame",
                slice.len()
            )));
        }

        Ok(value)
    }
}

/// Positional access to the elements of a decoded frame array.
///
/// Fields are consumed front to back; every accessor names the field it is
/// reading so a failure reports which position was malformed.
pub struct FrameFields {
    fields: std::vec::IntoIter<Value>,
}

impl FrameFields {
    /// Unpacks `value` as an array of exactly `expected` elements.
    pub fn unpack(value: Value, expected: usize) -> Result<Self, FrameDecodeError> {
        let fields = match value {
            Value::Array(fields) => fields,
            _ => return Err(FrameDecodeError::NotAnArray),
        };

        if fields.len() != expected {
            return Err(FrameDecodeError::InvalidLength {
                expected,
                actual: fields.len(),
            });
        }

        Ok(Self {
            fields: fields.into_iter(),
        })
    }

    fn next(&mut self, field: &'static str) -> Result<Value, FrameDecodeError> {
        self.fields
            .next()
            .ok_or(FrameDecodeError::InvalidField { field })
    }

    pub fn next_value(&mut self, field: &'static str) -> Result<Value, FrameDecodeError> {
        self.next(field)
    }

    pub fn next_u64(&mut self, field: &'static str) -> Result<u64, FrameDecodeError> {
        self.next(field)?
            .as_u64()
            .ok_or(FrameDecodeError::InvalidField { field })
    }

    pub fn next_u32(&mut self, field: &'static str) -> Result<u32, FrameDecodeError> {
        u32::try_from(self.next_u64(field)?).map_err(|_| FrameDecodeError::InvalidField { field })
    }

    pub fn next_string(&mut self, field: &'static str) -> Result<String, FrameDecodeError> {
        match self.next(field)? {
            Value::String(s) => s
                .into_str()
                .ok_or(FrameDecodeError::InvalidField { field }),
            _ => Err(FrameDecodeError::InvalidField { field }),
        }
    }

    pub fn next_array(&mut self, field: &'static str) -> Result<Vec<Value>, FrameDecodeError> {
        match self.next(field)? {
            Value::Array(items) => Ok(items),
            _ => Err(FrameDecodeError::InvalidField { field }),
        }
    }
}
