mod frame_codec;
mod frame_error;
#[cfg(feature = "tokio_support")]
mod frame_reader;
mod frame_stream_decoder;

pub use frame_codec::{FrameCodec, FrameFields};
pub use frame_error::{FrameDecodeError, FrameEncodeError};
#[cfg(feature = "tokio_support")]
pub use frame_reader::read_frame;
pub use frame_stream_decoder::FrameStreamDecoder;
