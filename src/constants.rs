// Frame layout constants

/// Number of positional elements in an encoded request frame:
/// `[type, message-id, method-name, parameters]`.
pub const RPC_REQUEST_FRAME_LEN: usize = 4;

/// Number of positional elements in an encoded response frame:
/// `[type, message-id, error, result]`.
pub const RPC_RESPONSE_FRAME_LEN: usize = 4;

/// Number of positional elements in an encoded error: `[description, code]`.
pub const RPC_ERROR_FRAME_LEN: usize = 2;

/// Upper bound on the bytes buffered while waiting for a single frame to
/// complete. A peer that keeps streaming past this without ever finishing a
/// MessagePack value is treated as sending a corrupt frame.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Size of each read issued against the transport while assembling a frame.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// The message-id every client request carries. There is never more than one
/// request in flight per connection, so the id is fixed; servers echo
/// whatever they receive.
pub const CLIENT_MESSAGE_ID: u32 = 1;
