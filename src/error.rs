use std::result;

pub type Result<T> = result::Result<T, Error>;

/// Everything that can go wrong in the codec.
///
/// Only [`Error::IncompleteBuffer`] is meant to be caught and retried: it
/// means the buffer ends in the middle of a message, and the caller should
/// unmarshal the same message again once more bytes have arrived. All other
/// variants are final for the operation that raised them.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The buffer ends before the message does. Recoverable: collect more
    /// bytes and retry from the start of the pending message.
    #[error("incomplete buffer")]
    IncompleteBuffer,

    /// The peer sent bytes that violate the wire format. The connection
    /// layer decides whether to drop the peer.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    /// The caller supplied a malformed type signature.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The caller supplied a value incompatible with the declared type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A fixed-width integer was given a value outside its legal range.
    #[error("{value} is out of range for {type_name}")]
    OutOfRange {
        value: i128,
        type_name: &'static str,
    },

    /// The message names the reserved local path, which must never go
    /// out on the wire.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}

impl Error {
    /// True for the one condition a caller is expected to retry.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::IncompleteBuffer)
    }
}
