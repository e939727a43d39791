// elassets-parsers/src/cursor.rs
//! Bounds-checked little-endian reader over an in-memory buffer
//!
//! Every read checks the remaining length first and fails with
//! [`DecodeError::OutOfBounds`]; nothing is clamped or zero-padded.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use elassets_core::{Quat, Vec3};

use crate::traits::{DecodeError, DecodeOptions, DecodeResult};

/// Sequential and offset-addressed reader
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Total buffer length
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left after the current offset
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to an absolute offset. Seeking to the end is allowed.
    pub fn seek(&mut self, offset: usize) -> DecodeResult<()> {
        if offset > self.len() {
            return Err(DecodeError::OutOfBounds {
                offset,
                requested: 0,
                available: 0,
            });
        }
        self.inner.set_position(offset as u64);
        Ok(())
    }

    /// Fail unless `count` more bytes can be read
    pub fn ensure(&self, count: usize) -> DecodeResult<()> {
        if count > self.remaining() {
            return Err(self.bounds_error(count));
        }
        Ok(())
    }

    fn bounds_error(&self, requested: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset: self.position(),
            requested,
            available: self.remaining(),
        }
    }

    fn read_with<T>(
        &mut self,
        width: usize,
        read: impl FnOnce(&mut Cursor<&'a [u8]>) -> std::io::Result<T>,
    ) -> DecodeResult<T> {
        self.ensure(width)?;
        read(&mut self.inner).map_err(|_| self.bounds_error(width))
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        self.read_with(1, |c| c.read_u8())
    }

    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        self.read_with(1, |c| c.read_i8())
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.read_with(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        self.read_with(2, |c| c.read_i16::<LittleEndian>())
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.read_with(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        self.read_with(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        self.read_with(4, |c| c.read_f32::<LittleEndian>())
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn read_bytes(&mut self, count: usize) -> DecodeResult<&'a [u8]> {
        self.ensure(count)?;
        let data: &'a [u8] = *self.inner.get_ref();
        let start = self.position();
        self.inner.set_position((start + count) as u64);
        Ok(&data[start..start + count])
    }

    pub fn skip(&mut self, count: usize) -> DecodeResult<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Read a fixed-width text field, see [`fixed_str`]
    pub fn read_fixed_str(&mut self, len: usize) -> DecodeResult<String> {
        self.read_bytes(len).map(fixed_str)
    }

    /// Read a `u32` length followed by that many bytes of text
    pub fn read_prefixed_str(&mut self) -> DecodeResult<String> {
        let len = self.read_u32()? as usize;
        self.read_fixed_str(len)
    }

    /// Consume `magic` or fail with [`DecodeError::InvalidMagic`]
    pub fn expect_magic(&mut self, magic: &[u8]) -> DecodeResult<()> {
        let found = self.read_bytes(magic.len())?;
        if found != magic {
            return Err(DecodeError::InvalidMagic {
                expected: magic.to_vec(),
                found: found.to_vec(),
            });
        }
        Ok(())
    }

    /// Read a `u32` element count and check it against the configured limit
    pub fn read_count(&mut self, what: &'static str, options: &DecodeOptions) -> DecodeResult<usize> {
        let count = self.read_u32()?;
        options.check_count(what, u64::from(count))?;
        Ok(count as usize)
    }

    /// Capacity for `count` elements of at least `min_size` bytes each,
    /// clamped to what the rest of the buffer could hold
    pub fn capacity_for(&self, count: usize, min_size: usize) -> usize {
        count.min(self.remaining() / min_size.max(1))
    }

    /// Three floats, as stored
    pub fn read_vec3(&mut self) -> DecodeResult<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Four floats `x, y, z, w`, as stored
    pub fn read_quat(&mut self) -> DecodeResult<Quat> {
        Ok(Quat::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Three floats converted to Y-up
    pub fn read_vec3_y_up(&mut self) -> DecodeResult<Vec3> {
        self.read_vec3().map(Vec3::to_y_up)
    }

    /// Four floats converted to Y-up
    pub fn read_quat_y_up(&mut self) -> DecodeResult<Quat> {
        self.read_quat().map(Quat::to_y_up)
    }
}

/// Decode a fixed-width text field.
///
/// The text ends at the first NUL byte. Whatever follows it is padding and
/// is dropped, even if it is not NUL. Invalid UTF-8 is replaced and a
/// leading `./` is removed.
pub fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = String::from_utf8_lossy(&bytes[..end]);
    strip_dot_slash(&text).to_string()
}

/// Remove one leading `./` from a path
pub fn strip_dot_slash(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}
