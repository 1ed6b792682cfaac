//! Writing encoded records to output streams.

use crate::bean::Bean;
use crate::codec::RecordCodec;
use crate::error::CodecError;
use std::io::Write;

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    Codec(CodecError),
    Io(std::io::Error),
}

impl From<CodecError> for SerializationError {
    fn from(err: CodecError) -> Self {
        SerializationError::Codec(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::Io(err)
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::Codec(e) => write!(f, "Codec error: {}", e),
            SerializationError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Record writer
///
/// Writes beans as encoded records, each followed by the codec's line break.
/// A list-shaped bean spans several lines on its own.
pub struct RecordWriter<'c, W: Write> {
    writer: W,
    codec: &'c RecordCodec,
    written: usize,
}

impl<'c, W: Write> RecordWriter<'c, W> {
    /// Create a new record writer
    pub fn new(writer: W, codec: &'c RecordCodec) -> Self {
        Self {
            writer,
            codec,
            written: 0,
        }
    }

    /// Write a single bean as a record
    pub fn write<B: Bean>(&mut self, bean: &B) -> Result<(), SerializationError> {
        let record = self.codec.encode(bean)?;
        self.writer.write_all(record.as_bytes())?;
        self.writer.write_all(self.codec.config().line_break.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Write multiple beans
    pub fn write_all<B: Bean>(&mut self, beans: &[B]) -> Result<(), SerializationError> {
        for bean in beans {
            self.write(bean)?;
        }
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W, SerializationError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
