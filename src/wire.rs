//! Primitive wire codec shared by the .col, .mate and .tex serializers.
//!
//! Strings are stored the way the game's own C# serializer stores them: a
//! 7-bit varint byte length followed by UTF-8 bytes. Integers and floats are
//! 4-byte little-endian.

use std::io::{self, Read, Write};

use crate::error::{CodecError, CodecResult};

/// Forward-only reader with a single-token look-ahead.
///
/// The look-ahead exists for sentinel-terminated lists, whose termination
/// token and next record tag share the same field position.
pub struct Reader<R> {
    inner: R,
    pushback: Option<String>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
        }
    }

    /// Reads one length-prefixed string.
    pub fn read_str(&mut self, field: &'static str) -> CodecResult<String> {
        if let Some(token) = self.pushback.take() {
            return Ok(token);
        }
        self.read_str_raw(field)
    }

    /// Returns the next length-prefixed string without consuming it.
    ///
    /// The token stays buffered until the next `read_str` call picks it up.
    pub fn peek_str(&mut self, field: &'static str) -> CodecResult<&str> {
        if self.pushback.is_none() {
            let token = self.read_str_raw(field)?;
            self.pushback = Some(token);
        }
        Ok(self.pushback.as_deref().unwrap_or(""))
    }

    pub fn read_i32(&mut self, field: &'static str) -> CodecResult<i32> {
        debug_assert!(self.pushback.is_none(), "unconsumed look-ahead token");
        let mut buf = [0u8; 4];
        self.inner
            .read_exact(&mut buf)
            .map_err(|source| CodecError::Read { field, source })?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_f32(&mut self, field: &'static str) -> CodecResult<f32> {
        debug_assert!(self.pushback.is_none(), "unconsumed look-ahead token");
        let mut buf = [0u8; 4];
        self.inner
            .read_exact(&mut buf)
            .map_err(|source| CodecError::Read { field, source })?;
        Ok(f32::from_le_bytes(buf))
    }

    /// Reads a fixed-size float block, e.g. a position or a quaternion.
    pub fn read_f32_array<const N: usize>(&mut self, field: &'static str) -> CodecResult<[f32; N]> {
        let mut out = [0.0f32; N];
        for value in &mut out {
            *value = self.read_f32(field)?;
        }
        Ok(out)
    }

    /// Reads exactly `len` raw bytes. A short read is a hard error carrying
    /// how many bytes were actually available.
    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> CodecResult<Vec<u8>> {
        debug_assert!(self.pushback.is_none(), "unconsumed look-ahead token");
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(CodecError::Truncated {
                        field,
                        expected: len,
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(CodecError::Read { field, source }),
            }
        }
        Ok(buf)
    }

    fn read_str_raw(&mut self, field: &'static str) -> CodecResult<String> {
        let len = self.read_varint_len(field)?;
        let mut buf = vec![0u8; len];
        self.inner
            .read_exact(&mut buf)
            .map_err(|source| CodecError::Read { field, source })?;
        String::from_utf8(buf).map_err(|_| CodecError::InvalidUtf8 { field })
    }

    fn read_varint_len(&mut self, field: &'static str) -> CodecResult<usize> {
        let mut value: u32 = 0;
        let mut shift = 0u32;
        loop {
            let mut byte = [0u8; 1];
            self.inner
                .read_exact(&mut byte)
                .map_err(|source| CodecError::Read { field, source })?;
            value |= u32::from(byte[0] & 0x7f) << shift;
            if byte[0] & 0x80 == 0 {
                return Ok(value as usize);
            }
            shift += 7;
            if shift >= 35 {
                return Err(CodecError::Read {
                    field,
                    source: io::Error::new(
                        io::ErrorKind::InvalidData,
                        "string length prefix is longer than 5 bytes",
                    ),
                });
            }
        }
    }
}

/// Forward-only writer producing the same layout `Reader` consumes.
pub struct Writer<W> {
    inner: W,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes one length-prefixed string.
    pub fn write_str(&mut self, field: &'static str, value: &str) -> CodecResult<()> {
        let bytes = value.as_bytes();
        let len = u32::try_from(bytes.len()).map_err(|_| CodecError::LengthOverflow {
            field,
            len: bytes.len(),
        })?;
        self.write_varint_len(field, len)?;
        self.write_all(field, bytes)
    }

    pub fn write_i32(&mut self, field: &'static str, value: i32) -> CodecResult<()> {
        self.write_all(field, &value.to_le_bytes())
    }

    pub fn write_f32(&mut self, field: &'static str, value: f32) -> CodecResult<()> {
        self.write_all(field, &value.to_le_bytes())
    }

    pub fn write_f32_array(&mut self, field: &'static str, values: &[f32]) -> CodecResult<()> {
        for value in values {
            self.write_f32(field, *value)?;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, field: &'static str, bytes: &[u8]) -> CodecResult<()> {
        self.write_all(field, bytes)
    }

    pub fn flush(&mut self, field: &'static str) -> CodecResult<()> {
        self.inner
            .flush()
            .map_err(|source| CodecError::Write { field, source })
    }

    fn write_varint_len(&mut self, field: &'static str, len: u32) -> CodecResult<()> {
        let mut rest = len;
        loop {
            let byte = (rest & 0x7f) as u8;
            rest >>= 7;
            if rest == 0 {
                return self.write_all(field, &[byte]);
            }
            self.write_all(field, &[byte | 0x80])?;
        }
    }

    fn write_all(&mut self, field: &'static str, bytes: &[u8]) -> CodecResult<()> {
        self.inner
            .write_all(bytes)
            .map_err(|source| CodecError::Write { field, source })
    }
}

#[cfg(test)]
#[path = "tests/wire_tests.rs"]
mod tests;
