use crate::{BufferError, Result, Storage};
use alloc::vec::Vec;

use zerocopy::byteorder::{F32, F64, LE};

/// A growable byte buffer with a single cursor that is shared by reads and writes.
///
/// The buffer tracks three quantities:
///
/// * the _capacity_ of its [`Storage`], which is the number of addressable bytes;
/// * the _length_, which is the high-water mark of everything written (or adopted). Reads
///   never go past the length, and the length never decreases;
/// * the _position_, which is the cursor. Every read and every write starts at the position and
///   advances it. There is no separate read cursor, so a sequence such as "write a field, move
///   back, read it" works as expected.
///
/// Multi-byte fixed-width values are stored in little-endian byte order, regardless of the host.
/// Compressed integers use the ECMA-335 encoding, whose continuation bytes are big-endian; see
/// [`CompressedWidth`](crate::CompressedWidth).
///
/// # Aliasing
///
/// A write may replace the storage with a larger one. For that reason, every `read_*` method
/// returns an owned value (a scalar, an array or a `Vec<u8>`), never a reference into the
/// storage. The views returned by [`ByteBuffer::as_bytes`] borrow the buffer, so they cannot be
/// held across a write.
#[derive(Clone)]
pub struct ByteBuffer<S = Vec<u8>> {
    storage: S,
    length: usize,
    position: usize,
}

impl ByteBuffer<Vec<u8>> {
    /// Creates an empty buffer with no storage.
    pub fn new() -> Self {
        Self::from_storage(Vec::new())
    }

    /// Creates an empty buffer whose storage already holds `capacity` bytes.
    ///
    /// The bytes are addressable but not valid: the length is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: alloc::vec![0; capacity],
            length: 0,
            position: 0,
        }
    }

    /// Adopts `bytes` as the storage. The whole vector is valid data and the cursor is at 0.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_storage(bytes)
    }

    /// Extracts the written region `[0, len)`, dropping any spare capacity.
    pub fn into_vec(self) -> Vec<u8> {
        let mut storage = self.storage;
        storage.truncate(self.length);
        storage
    }
}

impl Default for ByteBuffer<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for ByteBuffer<Vec<u8>> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<S: Storage> core::fmt::Debug for ByteBuffer<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("position", &self.position)
            .field("length", &self.length)
            .field("capacity", &self.storage.capacity())
            .finish()
    }
}

impl<S: Storage> ByteBuffer<S> {
    /// Adopts `storage`. Every byte of it is valid data and the cursor is at 0.
    pub fn from_storage(storage: S) -> Self {
        let length = storage.capacity();
        Self {
            storage,
            length,
            position: 0,
        }
    }

    /// Returns the storage, including any bytes beyond the length.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The cursor.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`, which may be anywhere within the capacity.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        let capacity = self.storage.capacity();
        if position > capacity {
            return Err(BufferError::OutOfBounds {
                position: self.position,
                requested: position.saturating_sub(self.position),
                length: capacity,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Moves the cursor forward by `n` bytes, without reading or writing anything.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        let capacity = self.storage.capacity();
        match self.position.checked_add(n) {
            Some(end) if end <= capacity => {
                self.position = end;
                Ok(())
            }
            _ => Err(BufferError::OutOfBounds {
                position: self.position,
                requested: n,
                length: capacity,
            }),
        }
    }

    /// The high-water mark: the number of valid bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if no bytes are valid.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of addressable bytes in the storage.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Number of valid bytes after the cursor.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.length.saturating_sub(self.position)
    }

    /// The valid region `[0, len)`. Bytes beyond the length are never exposed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.length]
    }

    /// Copies the valid region `[0, len)` into a new vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// The valid region as a `BStr`, which is convenient for debugging output.
    #[cfg(feature = "bstr")]
    pub fn as_bstr(&self) -> &bstr::BStr {
        bstr::BStr::new(self.as_bytes())
    }

    /// Checks that `len` valid bytes follow the cursor and returns the end of that range.
    #[inline(always)]
    fn check_read(&self, len: usize) -> Result<usize> {
        match self.position.checked_add(len) {
            Some(end) if end <= self.length => Ok(end),
            _ => Err(BufferError::OutOfBounds {
                position: self.position,
                requested: len,
                length: self.length,
            }),
        }
    }

    /// Returns the byte at the cursor without consuming it.
    pub(crate) fn peek_u8(&self) -> Result<u8> {
        self.check_read(1)?;
        Ok(self.storage.bytes()[self.position])
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Copies `len` bytes out of the buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let end = self.check_read(len)?;
        let bytes = self.storage.bytes()[self.position..end].to_vec();
        self.position = end;
        Ok(bytes)
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.check_read(N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.storage.bytes()[self.position..end]);
        self.position = end;
        Ok(bytes)
    }

    /// Reads a `u16` in little-endian byte order.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u32` in little-endian byte order.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u64` in little-endian byte order.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads a `i16` in little-endian byte order.
    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Reads a `i32` in little-endian byte order.
    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a `i64` in little-endian byte order.
    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Reads an IEEE-754 `f32` stored in little-endian byte order.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(F32::<LE>::from_bytes(self.read_array()?).get())
    }

    /// Reads an IEEE-754 `f64` stored in little-endian byte order.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(F64::<LE>::from_bytes(self.read_array()?).get())
    }

    /// Makes room for `len` bytes at the cursor, growing the storage if needed. Returns the end
    /// of the range. The buffer is unchanged if growth fails.
    fn prepare_write(&mut self, len: usize) -> Result<usize> {
        let Some(end) = self.position.checked_add(len) else {
            return Err(BufferError::AllocationFailed {
                requested: usize::MAX,
            });
        };

        let capacity = self.storage.capacity();
        if end > capacity {
            let Some(new_capacity) = capacity
                .checked_add(len)
                .map(|needed| needed.max(capacity.saturating_mul(2)))
            else {
                return Err(BufferError::AllocationFailed {
                    requested: usize::MAX,
                });
            };
            log::trace!("growing byte buffer from {capacity} to {new_capacity} bytes");
            self.storage.grow_to(new_capacity)?;
        }

        Ok(end)
    }

    #[inline(always)]
    fn finish_write(&mut self, end: usize) {
        self.position = end;
        if self.position > self.length {
            self.length = self.position;
        }
    }

    /// Writes `bytes` at the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.prepare_write(bytes.len())?;
        self.storage.bytes_mut()[self.position..end].copy_from_slice(bytes);
        self.finish_write(end);
        Ok(())
    }

    /// Writes a small, fixed-size array of bytes.
    #[inline(always)]
    pub fn write_array<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Reserves `len` bytes at the cursor without writing them, so that they can be patched
    /// later. The bytes keep whatever the storage held before.
    pub fn write_reserved(&mut self, len: usize) -> Result<()> {
        let end = self.prepare_write(len)?;
        self.finish_write(end);
        Ok(())
    }

    /// Writes the valid region of `other` at the cursor. Spare capacity in `other` is not
    /// copied.
    pub fn write_buffer<T: Storage>(&mut self, other: &ByteBuffer<T>) -> Result<()> {
        self.write_bytes(other.as_bytes())
    }

    /// Writes a single `u8` value
    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_array([value])
    }

    /// Writes a single `i8` value
    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_array([value as u8])
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes an `f32` value using its 4-byte little-endian IEEE-754 representation.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_array(F32::<LE>::new(value).to_bytes())
    }

    /// Writes an `f64` value using its 8-byte little-endian IEEE-754 representation.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_array(F64::<LE>::new(value).to_bytes())
    }
}
