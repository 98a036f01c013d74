//! A growable, cursor-based byte buffer for the binary encodings used in ECMA-335 metadata
//! streams: little-endian fixed-width primitives and "compressed" variable-length integers.
//!
//! [`ByteBuffer`] owns its storage and keeps a single cursor that is shared by reads and
//! writes. Writes grow the storage on demand; reads never go past the high-water mark of
//! what has been written (or adopted).
//!
//! With the `std` feature, [`BinarySink`] forwards primitives, raw bytes and whole buffers
//! onto any `std::io::Write` destination.
//!
//! # References
//! * ECMA-335, Partition II, §23.2 "Blobs and signatures"

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod buffer;
mod compressed;
mod error;
#[cfg(feature = "std")]
mod sink;
mod storage;


pub use buffer::ByteBuffer;
pub use compressed::{
    CompressedWidth, MAX_COMPRESSED_I32, MAX_COMPRESSED_U32, MIN_COMPRESSED_I32,
};
pub use error::{BufferError, Result};
#[cfg(feature = "std")]
pub use sink::{BinarySink, TRANSFER_CHUNK_SIZE};
pub use storage::Storage;
