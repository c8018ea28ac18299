use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameEncodeError {
    /// A value could not be converted into its MessagePack representation.
    Serialize(String),

    /// The MessagePack writer failed while producing frame bytes.
    Write(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameDecodeError {
    /// The bytes are not valid MessagePack.
    CorruptFrame(String),

    /// The frame decoded to something other than a positional array.
    NotAnArray,

    /// The positional array has too many or too few elements.
    InvalidLength { expected: usize, actual: usize },

    /// A positional field holds a value of the wrong kind or range.
    InvalidField { field: &'static str },

    /// The type discriminator is unknown, or not valid for this frame shape.
    UnexpectedMessageType(u64),

    /// More than the allowed number of bytes were buffered without completing a frame.
    FrameTooLarge { limit: usize },
}

impl FrameDecodeError {
    /// Recovers a decode error that a frame reader wrapped into an
    /// `InvalidData` I/O error.
    pub fn from_io_error(err: &io::Error) -> Option<Self> {
        if err.kind() != io::ErrorKind::InvalidData {
            return None;
        }
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<FrameDecodeError>())
            .cloned()
    }
}

impl fmt::Display for FrameEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEncodeError::Serialize(msg) => write!(f, "failed to serialize value: {msg}"),
            FrameEncodeError::Write(msg) => write!(f, "failed to write frame: {msg}"),
        }
    }
}

impl fmt::Display for FrameDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDecodeError::CorruptFrame(msg) => write!(f, "corrupt frame: {msg}"),
            FrameDecodeError::NotAnArray => write!(f, "frame is not an array"),
            FrameDecodeError::InvalidLength { expected, actual } => write!(
                f,
                "frame has {actual} elements, expected {expected}"
            ),
            FrameDecodeError::InvalidField { field } => write!(f, "invalid `{field}` field"),
            FrameDecodeError::UnexpectedMessageType(t) => {
                write!(f, "unexpected message type {t}")
            }
            FrameDecodeError::FrameTooLarge { limit } => {
                write!(f, "frame exceeds the {limit} byte limit")
            }
        }
    }
}

impl std::error::Error for FrameEncodeError {}

impl std::error::Error for FrameDecodeError {}
