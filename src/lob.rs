//! In-memory large-object values.
//!
//! [`Clob`] and [`Blob`] stand in for database character and binary large
//! objects. Both expose their content as a readable stream and can be built
//! from any [`Read`] source. Encoding a large object drains it completely into
//! memory; nothing bounds the size of that buffer.

use crate::encoding::TextEncoding;
use std::io::{self, BufRead, Cursor, Read};

/// Character large object
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Clob {
    text: String,
}

impl Clob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a whole character stream into a new large object.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self { text })
    }

    /// Stream over the stored characters
    pub fn reader(&self) -> impl BufRead + '_ {
        Cursor::new(self.text.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Read the stream line by line and concatenate the lines.
    ///
    /// Line terminators (`\n`, `\r\n` or a lone `\r`) are dropped, so
    /// multi-line content does not survive a round trip through record text.
    pub fn drain_lines(&self) -> io::Result<String> {
        let mut reader = self.reader();
        let mut out = String::with_capacity(self.text.len());
        let mut line = Vec::new();
        while read_line(&mut reader, &mut line)? {
            let text = std::str::from_utf8(&line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            out.push_str(text);
            line.clear();
        }
        Ok(out)
    }
}

impl From<String> for Clob {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for Clob {
    fn from(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

/// Binary large object
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a whole binary stream into a new large object.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn reader(&self) -> impl BufRead + '_ {
        Cursor::new(self.bytes.as_slice())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the stream with `encoding` line by line and concatenate the lines.
    ///
    /// Terminators are dropped the same way as [`Clob::drain_lines`].
    pub fn drain_lines(&self, encoding: TextEncoding) -> io::Result<String> {
        let mut reader = self.reader();
        let mut out = String::with_capacity(self.bytes.len());
        let mut line = Vec::new();
        while read_line(&mut reader, &mut line)? {
            out.push_str(&encoding.decode(&line));
            line.clear();
        }
        Ok(out)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }
}

/// Append the next line of `reader` to `line` without its terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Returns `false` once the
/// stream is exhausted.
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<bool> {
    let mut read_any = false;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(read_any);
        }
        read_any = true;
        match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let carriage_return = buf[i] == b'\r';
                line.extend_from_slice(&buf[..i]);
                reader.consume(i + 1);
                if carriage_return && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            None => {
                let len = buf.len();
                line.extend_from_slice(buf);
                reader.consume(len);
            }
        }
    }
}
