//! Reader — the raw record source the decoder pulls from.

mod line;

pub use line::LineReader;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One physical line as read from a log file, before format interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Line content, trailing newline included when present
    pub content: Bytes,
    /// Read time
    pub ts: DateTime<Utc>,
    /// Bytes consumed from the source
    pub bytes: usize,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("end of stream")]
    EndOfStream,

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Pull-based source of raw records.
///
/// Blocking and cancellation are the implementor's business: a timeout
/// should surface as `ReadError::EndOfStream` or `ReadError::Io`.
pub trait RawReader {
    fn next_record(&mut self) -> Result<RawRecord, ReadError>;
}

impl<R: RawReader + ?Sized> RawReader for Box<R> {
    fn next_record(&mut self) -> Result<RawRecord, ReadError> {
        (**self).next_record()
    }
}
