use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The wire discriminator carried in the first position of every frame.
///
/// These values are fixed by the protocol and must never be renumbered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum RpcMessageType {
    /// A request that expects exactly one response.
    Call = 0,
    /// The reply to a `Call`.
    Response = 1,
    /// A fire-and-forget request; no response is ever emitted.
    Notification = 2,
}

impl RpcMessageType {
    #[inline]
    pub fn value(self) -> u8 {
        self.into()
    }

    /// Maps a decoded integer discriminator onto a message type.
    pub fn from_wire(v: u64) -> Option<Self> {
        u8::try_from(v)
            .ok()
            .and_then(|b| RpcMessageType::try_from(b).ok())
    }
}
