use crate::{math::round_to, AsciiDisplay};
use byteorder::ByteOrder;
use log::debug;
use std::{marker::PhantomData, mem, mem::size_of};
use thiserror::Error;

/// UTF-8 byte order mark. Some tools prepend it to every string they write.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("sudden end of data at offset {offset} (needed {needed} bytes, {remaining} remaining)")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

/// Recoverable problems found while reading length prefixed strings. The reader keeps going
/// after any of these, see [`PrimitiveReader::read_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringIssue {
    /// A NUL byte showed up before the declared length was exhausted.
    EmbeddedNul {
        /// Offset of the length prefix
        offset: usize,
        declared: usize,
        decoded: usize,
    },
    /// The string bytes weren't valid UTF-8 and were decoded lossily.
    InvalidUtf8 { offset: usize },
}

/// Data parser allowing reading multibyte primitives in a stream-like fashion.
///
/// Every read either consumes exactly the width of the primitive, or fails with
/// [`ReadError::TruncatedInput`] without moving the cursor.
#[derive(Debug, Clone)]
pub struct PrimitiveReader<'s, Endian: ByteOrder> {
    data: &'s [u8],
    offset: usize,
    issues: Vec<StringIssue>,
    _phantom: PhantomData<Endian>,
}

macro_rules! reader_template {
    ($fn_name:ident, $ty_name:ty) => {
        pub fn $fn_name(&mut self) -> Result<$ty_name, ReadError> {
            let bytes = self.read_slice(size_of::<$ty_name>())?;
            Ok(Endian::$fn_name(bytes))
        }
    };
}

macro_rules! peeker_template {
    ($fn_name:ident, $reader_fn_name:ident, $ty_name:ty) => {
        pub fn $fn_name(&self) -> Result<$ty_name, ReadError> {
            let bytes = self.peek_slice(size_of::<$ty_name>())?;
            Ok(Endian::$reader_fn_name(bytes))
        }
    };
}

impl<'s, Endian: ByteOrder> PrimitiveReader<'s, Endian> {
    pub fn new(data: &'s [u8]) -> Self {
        Self {
            data,
            offset: 0,
            issues: Vec::new(),
            _phantom: Default::default(),
        }
    }

    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining_bytes() == 0
    }

    fn ensure_available(&self, count: usize) -> Result<(), ReadError> {
        if self.remaining_bytes() >= count {
            Ok(())
        } else {
            Err(ReadError::TruncatedInput {
                offset: self.offset,
                needed: count,
                remaining: self.remaining_bytes(),
            })
        }
    }

    /// Returns the next `count` bytes without advancing.
    pub fn peek_slice(&self, count: usize) -> Result<&'s [u8], ReadError> {
        self.ensure_available(count)?;
        Ok(&self.data[self.offset..self.offset + count])
    }

    /// Returns the next `count` bytes and advances past them.
    pub fn read_slice(&mut self, count: usize) -> Result<&'s [u8], ReadError> {
        let slice = self.peek_slice(count)?;
        self.offset += count;
        Ok(slice)
    }

    /// Skips reserved or padding bytes. Unlike a plain seek this refuses to move past the end.
    pub fn skip(&mut self, count: usize) -> Result<(), ReadError> {
        self.ensure_available(count)?;
        self.offset += count;
        Ok(())
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut result = [0; N];
        result.copy_from_slice(self.read_slice(N)?);
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn peek_u8(&self) -> Result<u8, ReadError> {
        Ok(self.peek_slice(1)?[0])
    }

    reader_template!(read_u16, u16);
    reader_template!(read_i16, i16);
    reader_template!(read_u32, u32);
    reader_template!(read_i32, i32);
    reader_template!(read_u64, u64);
    reader_template!(read_i64, i64);
    reader_template!(read_f32, f32);
    reader_template!(read_f64, f64);
    peeker_template!(peek_u16, read_u16, u16);
    peeker_template!(peek_u32, read_u32, u32);
    peeker_template!(peek_f32, read_f32, f32);

    /// Reads an `f32` and rounds it to `digits` decimal places.
    pub fn read_f32_rounded(&mut self, digits: u32) -> Result<f32, ReadError> {
        Ok(round_to(self.read_f32()?, digits))
    }

    /// Reads `N` consecutive `f32` values, each rounded to `digits` decimal places if given.
    pub fn read_f32_array<const N: usize>(
        &mut self,
        digits: Option<u32>,
    ) -> Result<[f32; N], ReadError> {
        let mut result = [0.0; N];
        for value in &mut result {
            *value = match digits {
                Some(digits) => self.read_f32_rounded(digits)?,
                None => self.read_f32()?,
            };
        }
        Ok(result)
    }

    /// Reads a string prefixed with an 8-bit length.
    ///
    /// A leading byte order mark is dropped. If a NUL byte shows up before the declared length
    /// is exhausted, reading stops *at* that byte (it is left unconsumed) and the issue is
    /// recorded, see [`Self::take_issues`]. Running out of data is still a hard error.
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let prefix_offset = self.offset;
        let declared = self.read_u8()? as usize;
        let body_start = self.offset;

        for _ in 0..declared {
            if self.peek_u8()? == 0 {
                let issue = StringIssue::EmbeddedNul {
                    offset: prefix_offset,
                    declared,
                    decoded: self.offset - body_start,
                };
                debug!(
                    "String at offset {prefix_offset} contains a NUL byte after `{}` ({} of {declared} bytes)",
                    AsciiDisplay(&self.data[body_start..self.offset]),
                    self.offset - body_start,
                );
                self.issues.push(issue);
                break;
            }
            self.offset += 1;
        }

        let mut body = &self.data[body_start..self.offset];
        if body.starts_with(&UTF8_BOM) {
            body = &body[UTF8_BOM.len()..];
        }

        match std::str::from_utf8(body) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) => {
                debug!(
                    "String at offset {prefix_offset} isn't valid UTF-8: `{}`",
                    AsciiDisplay(body)
                );
                self.issues.push(StringIssue::InvalidUtf8 {
                    offset: prefix_offset,
                });
                Ok(String::from_utf8_lossy(body).into_owned())
            }
        }
    }

    /// Drains the string issues collected so far.
    pub fn take_issues(&mut self) -> Vec<StringIssue> {
        mem::take(&mut self.issues)
    }

    pub fn data(&self) -> &'s [u8] {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}
