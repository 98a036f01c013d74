use crate::{BufferError, Result};
use alloc::vec::Vec;

/// Backing store for a [`ByteBuffer`](crate::ByteBuffer).
///
/// The capacity of a store is the length of the slice returned by [`Storage::bytes`]. Every
/// byte in that slice is addressable by the buffer, even if it has not been written yet.
///
/// `Vec<u8>` is the default store. `&mut [u8]` is also a store; it lets a buffer write into
/// caller-provided memory, but it can never grow.
pub trait Storage {
    /// The whole store, including bytes that have not been written.
    fn bytes(&self) -> &[u8];

    /// The whole store, mutably.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Number of addressable bytes.
    fn capacity(&self) -> usize {
        self.bytes().len()
    }

    /// Grows the store to exactly `new_capacity` bytes, which is larger than the current
    /// capacity. The first `capacity()` bytes must be preserved.
    ///
    /// If this fails, the store must be left unchanged.
    fn grow_to(&mut self, new_capacity: usize) -> Result<()>;
}

impl Storage for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self.as_slice()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }

    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let additional = new_capacity.saturating_sub(self.len());
        self.try_reserve_exact(additional)
            .map_err(|_| BufferError::AllocationFailed {
                requested: new_capacity,
            })?;
        // The reservation succeeded, so this cannot reallocate.
        self.resize(new_capacity, 0);
        Ok(())
    }
}

impl Storage for &mut [u8] {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self[..]
    }

    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        log::debug!(
            "fixed storage of {} bytes cannot grow to {}",
            self.len(),
            new_capacity
        );
        Err(BufferError::AllocationFailed {
            requested: new_capacity,
        })
    }
}
