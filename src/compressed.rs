//! ECMA-335 compressed integers (Partition II, §23.2).
//!
//! An unsigned compressed integer occupies 1, 2 or 4 bytes. The width is encoded in the high bits
//! of the first byte:
//!
//! | first byte  | width | value bits | range                    |
//! |-------------|-------|------------|--------------------------|
//! | `0xxxxxxx`  | 1     | 7          | `0x00 ..= 0x7F`          |
//! | `10xxxxxx`  | 2     | 14         | `0x80 ..= 0x3FFF`        |
//! | `11xxxxxx`  | 4     | 30         | `0x4000 ..= 0x3FFF_FFFF` |
//!
//! The remaining bits of the first byte are the most significant bits of the value, and the
//! continuation bytes follow in big-endian order. This is the opposite of the fixed-width fields,
//! which are little-endian.
//!
//! A signed compressed integer is rotated left by one bit, so that the sign lands in the lowest
//! bit, and then stored as an unsigned compressed integer. Negative values are first offset into
//! the positive range of their width bracket.

use crate::{BufferError, ByteBuffer, Result, Storage};

/// Largest value that can be encoded by [`ByteBuffer::write_compressed_u32`].
pub const MAX_COMPRESSED_U32: u32 = 0x3FFF_FFFF;

/// Largest value that can be encoded by [`ByteBuffer::write_compressed_i32`].
pub const MAX_COMPRESSED_I32: i32 = 0x1FFF_FFFF;

/// Smallest value that can be encoded by [`ByteBuffer::write_compressed_i32`].
pub const MIN_COMPRESSED_I32: i32 = -0x1000_0000;

/// The three forms of a compressed integer.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CompressedWidth {
    /// 1 byte, tag `0b0`.
    One,
    /// 2 bytes, tag `0b10`.
    Two,
    /// 4 bytes, tag `0b11`.
    Four,
}

impl CompressedWidth {
    /// The narrowest form that can hold `value`, or `None` if `value` is larger than
    /// [`MAX_COMPRESSED_U32`].
    pub fn for_value(value: u32) -> Option<Self> {
        match value {
            0..=0x7F => Some(Self::One),
            0x80..=0x3FFF => Some(Self::Two),
            0x4000..=MAX_COMPRESSED_U32 => Some(Self::Four),
            _ => None,
        }
    }

    /// The form selected by the tag bits of the first byte of an encoded value.
    ///
    /// Every byte selects some form; malformed tags (`111xxxxx`) are not detected.
    pub fn from_lead_byte(b0: u8) -> Self {
        if b0 & 0x80 == 0 {
            Self::One
        } else if b0 & 0x40 == 0 {
            Self::Two
        } else {
            Self::Four
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

impl<S: Storage> ByteBuffer<S> {
    /// Reads an unsigned compressed integer.
    ///
    /// If the buffer ends in the middle of the encoded value, this returns
    /// `BufferError::OutOfBounds` and the cursor does not move.
    pub fn read_compressed_u32(&mut self) -> Result<u32> {
        Ok(match CompressedWidth::from_lead_byte(self.peek_u8()?) {
            CompressedWidth::One => u32::from(self.read_u8()?),
            CompressedWidth::Two => {
                let [b0, b1] = self.read_array()?;
                (u32::from(b0 & 0x3F) << 8) | u32::from(b1)
            }
            CompressedWidth::Four => {
                let [b0, b1, b2, b3] = self.read_array()?;
                u32::from_be_bytes([b0 & 0x3F, b1, b2, b3])
            }
        })
    }

    /// Reads a signed compressed integer.
    ///
    /// The offset applied to negative values depends on the width of the encoded form (taken
    /// from the tag bits of the first byte), not on the magnitude of the decoded value.
    pub fn read_compressed_i32(&mut self) -> Result<i32> {
        let b0 = self.peek_u8()?;
        // At most 30 significant bits, so this cannot wrap.
        let u = self.read_compressed_u32()? as i32;
        let v = u >> 1;
        if u & 1 == 0 {
            return Ok(v);
        }

        Ok(match b0 & 0xC0 {
            0x00 | 0x40 => v - 0x40,
            0x80 => v - 0x2000,
            _ => v - 0x1000_0000,
        })
    }

    /// Writes an unsigned compressed integer, using the narrowest form that can hold `value`.
    ///
    /// Values larger than [`MAX_COMPRESSED_U32`] are rejected with
    /// `BufferError::CompressedOutOfRange`.
    pub fn write_compressed_u32(&mut self, value: u32) -> Result<()> {
        let Some(width) = CompressedWidth::for_value(value) else {
            return Err(BufferError::CompressedOutOfRange {
                value: i64::from(value),
            });
        };
        self.write_compressed_with_width(value, width)
    }

    /// Writes a signed compressed integer.
    ///
    /// Non-negative values are shifted left by one and written in the narrowest form that fits.
    /// Negative values are offset into the bracket that contains them, then written in that
    /// bracket's form even when a narrower one would hold the offset value:
    ///
    /// | value                        | offset        | form    |
    /// |------------------------------|---------------|---------|
    /// | `-0x3F ..= -1`               | `0x40`        | 1 byte  |
    /// | `-0x2000 ..= -0x40`          | `0x2000`      | 2 bytes |
    /// | `-0x1000_0000 ..= -0x2001`   | `0x1000_0000` | 4 bytes |
    ///
    /// Values outside `MIN_COMPRESSED_I32 ..= MAX_COMPRESSED_I32` are rejected with
    /// `BufferError::CompressedOutOfRange`.
    pub fn write_compressed_i32(&mut self, value: i32) -> Result<()> {
        if value >= 0 {
            if value > MAX_COMPRESSED_I32 {
                return Err(BufferError::CompressedOutOfRange {
                    value: i64::from(value),
                });
            }
            return self.write_compressed_u32((value as u32) << 1);
        }

        let (remapped, width) = if value > -0x40 {
            (value + 0x40, CompressedWidth::One)
        } else if value >= -0x2000 {
            (value + 0x2000, CompressedWidth::Two)
        } else if value >= MIN_COMPRESSED_I32 {
            (value + 0x1000_0000, CompressedWidth::Four)
        } else {
            return Err(BufferError::CompressedOutOfRange {
                value: i64::from(value),
            });
        };

        self.write_compressed_with_width(((remapped as u32) << 1) | 1, width)
    }

    /// Writes `value` in the given form. The caller guarantees that it fits.
    fn write_compressed_with_width(&mut self, value: u32, width: CompressedWidth) -> Result<()> {
        match width {
            CompressedWidth::One => self.write_u8(value as u8),
            CompressedWidth::Two => self.write_array([0x80 | (value >> 8) as u8, value as u8]),
            CompressedWidth::Four => {
                let [b0, b1, b2, b3] = value.to_be_bytes();
                self.write_array([0xC0 | b0, b1, b2, b3])
            }
        }
    }
}
