/// Result type used by [`ByteBuffer`](crate::ByteBuffer) operations.
pub type Result<T> = core::result::Result<T, BufferError>;

/// Error type for `ByteBuffer`
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum BufferError {
    /// A read or cursor move would go past the end of the buffer.
    ///
    /// For reads, `length` is the high-water mark of valid data. For cursor moves, it is the
    /// capacity of the storage.
    OutOfBounds {
        /// Cursor position at the time of the request.
        position: usize,
        /// Number of bytes the operation needed.
        requested: usize,
        /// The limit that the request exceeded.
        length: usize,
    },

    /// The storage could not be grown to the requested capacity. The buffer is unchanged.
    AllocationFailed {
        /// The capacity that was requested.
        requested: usize,
    },

    /// The value cannot be represented using the compressed integer encoding.
    CompressedOutOfRange {
        /// The value that was rejected.
        value: i64,
    },
}

impl core::error::Error for BufferError {}

impl core::fmt::Display for BufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                requested,
                length,
            } => write!(
                f,
                "{requested} byte(s) at position {position} exceeds buffer length {length}"
            ),
            Self::AllocationFailed { requested } => {
                write!(f, "cannot grow buffer to {requested} bytes")
            }
            Self::CompressedOutOfRange { value } => {
                write!(f, "value {value} (0x{value:x}) cannot be encoded as a compressed integer")
            }
        }
    }
}
