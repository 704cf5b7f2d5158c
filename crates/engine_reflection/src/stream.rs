//! Byte streams backing blob properties.
//!
//! A blob property's getter appends to an [`OutputStream`]; its setter reads
//! the same bytes back through an [`InputStream`] cursor. Values are encoded
//! with MessagePack via `rmp-serde`, so a blob can hold any serialisable
//! sub-structure.

use std::io::Cursor;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised while reading or writing a blob stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Failed to encode a value to MessagePack.
    #[error("failed to encode blob value: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a value from MessagePack.
    #[error("failed to decode blob value: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The reader needed more bytes than remain.
    #[error("blob stream exhausted: needed {needed} bytes, {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },
}

/// Growable write buffer.
#[derive(Debug, Default, Clone)]
pub struct OutputStream {
    data: Vec<u8>,
}

impl OutputStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a MessagePack-encoded value.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Encode`] if serialisation fails.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), StreamError> {
        rmp_serde::encode::write(&mut self.data, value)?;
        Ok(())
    }

    /// Append raw bytes.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Read cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct InputStream<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> InputStream<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Decode the next MessagePack value.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Decode`] if the bytes are malformed or the
    /// stream ends early.
    pub fn read<T: DeserializeOwned>(&mut self) -> Result<T, StreamError> {
        Ok(rmp_serde::decode::from_read(&mut self.cursor)?)
    }

    /// Take the next `len` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::UnexpectedEnd`] if fewer than `len` bytes remain.
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], StreamError> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.position();
        let remaining = data.len() - start;
        if len > remaining {
            return Err(StreamError::UnexpectedEnd {
                needed: len,
                remaining,
            });
        }
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Key {
        time: f32,
        value: f32,
    }

    #[test]
    fn test_sequential_values() {
        let mut out = OutputStream::new();
        out.write(&3u32).unwrap();
        out.write(&Key { time: 0.5, value: 2.0 }).unwrap();
        out.write("tail").unwrap();

        let mut input = InputStream::new(out.as_bytes());
        assert_eq!(input.read::<u32>().unwrap(), 3);
        assert_eq!(input.read::<Key>().unwrap(), Key { time: 0.5, value: 2.0 });
        assert_eq!(input.read::<String>().unwrap(), "tail");
        assert!(input.is_at_end());
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let mut input = InputStream::new(&[]);
        assert!(matches!(input.read::<u32>(), Err(StreamError::Decode(_))));
    }

    #[test]
    fn test_raw_bytes() {
        let mut out = OutputStream::new();
        out.write_raw(&[1, 2, 3]);
        let mut input = InputStream::new(out.as_bytes());
        assert_eq!(input.read_raw(2).unwrap(), &[1, 2]);
        assert_eq!(input.remaining(), 1);
        assert!(matches!(
            input.read_raw(2),
            Err(StreamError::UnexpectedEnd { needed: 2, remaining: 1 })
        ));
    }
}
