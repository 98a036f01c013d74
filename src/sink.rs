use crate::{ByteBuffer, Storage};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Size of the chunk used by [`BinarySink::copy_from`].
pub const TRANSFER_CHUNK_SIZE: usize = 4096;

/// Writes primitives, raw bytes and whole [`ByteBuffer`]s directly to an output stream.
///
/// Multi-byte values are written in little-endian byte order. Nothing is buffered here; every
/// call goes straight to `out`.
pub struct BinarySink<W> {
    /// The output stream.
    pub out: W,
}

impl<W: Write> BinarySink<W> {
    /// Constructor
    pub fn wrap(out: W) -> Self {
        Self { out }
    }

    /// Extracts the inner stream
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Accesses the inner stream
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_array<const N: usize>(&mut self, value: [u8; N]) -> io::Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_array([value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> io::Result<()> {
        self.write_array([value as u8])
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) -> io::Result<()> {
        self.write_array(value.to_le_bytes())
    }

    /// Writes the valid region `[0, len)` of `buffer`.
    pub fn write_buffer<S: Storage>(&mut self, buffer: &ByteBuffer<S>) -> io::Result<()> {
        self.write_bytes(buffer.as_bytes())
    }

    /// Copies everything from `input` to the output, one [`TRANSFER_CHUNK_SIZE`] chunk at a
    /// time, until `input` reports end of data. Returns the number of bytes copied.
    pub fn copy_from<R: Read>(&mut self, mut input: R) -> io::Result<u64> {
        let mut chunk = [0u8; TRANSFER_CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.out.write_all(&chunk[..n])?;
            total += n as u64;
        }

        log::trace!("copied {total} bytes into sink");
        Ok(total)
    }
}

impl<W: Write + Seek> BinarySink<W> {
    /// The current offset in the output stream.
    pub fn position(&mut self) -> io::Result<u64> {
        self.out.stream_position()
    }

    /// Moves to an absolute offset in the output stream.
    pub fn set_position(&mut self, position: u64) -> io::Result<()> {
        self.out.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Moves forward (or backward, if negative) without writing.
    pub fn advance(&mut self, bytes: i64) -> io::Result<()> {
        self.out.seek(SeekFrom::Current(bytes))?;
        Ok(())
    }

    /// Writes zero bytes until the offset is a multiple of `alignment`, which must be a power
    /// of two.
    pub fn align(&mut self, alignment: u64) -> io::Result<()> {
        if !alignment.is_power_of_two() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "alignment must be a power of two",
            ));
        }

        let mask = alignment - 1;
        let position = self.position()?;
        let padding = ((position + mask) & !mask) - position;
        io::copy(&mut io::repeat(0).take(padding), &mut self.out)?;
        Ok(())
    }
}
