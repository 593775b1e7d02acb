use std::io::{BufRead, Read};

use bytes::Bytes;
use chrono::Utc;

use super::{RawReader, RawRecord, ReadError};
use crate::parser::MAX_LINE_SIZE;

/// Splits a byte stream into `\n` terminated records.
///
/// The newline stays in the record. A final line without one is still
/// returned, then the reader reports end of stream. Lines longer than
/// `max_line_bytes` come out as several records of at most that size.
///
/// Bytes read before an I/O error are kept and returned with the rest of
/// their line on a later call.
pub struct LineReader<R: BufRead> {
    reader: R,
    max_line_bytes: usize,
    current_line: Vec<u8>,
    offset: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_line_bytes: MAX_LINE_SIZE,
            current_line: Vec::new(),
            offset: 0,
        }
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes.max(1);
        self
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn take_record(&mut self) -> RawRecord {
        let content = Bytes::from(std::mem::take(&mut self.current_line));
        RawRecord {
            bytes: content.len(),
            content,
            ts: Utc::now(),
        }
    }
}

impl<R: BufRead> RawReader for LineReader<R> {
    fn next_record(&mut self) -> Result<RawRecord, ReadError> {
        loop {
            let remaining = self.max_line_bytes.saturating_sub(self.current_line.len());
            if remaining == 0 {
                return Ok(self.take_record());
            }

            let before = self.current_line.len();
            let result = (&mut self.reader)
                .take(remaining as u64)
                .read_until(b'\n', &mut self.current_line);
            self.offset += (self.current_line.len() - before) as u64;

            match result {
                Ok(0) if self.current_line.is_empty() => return Err(ReadError::EndOfStream),
                Ok(0) => return Ok(self.take_record()),
                Ok(_) if self.current_line.ends_with(b"\n") => return Ok(self.take_record()),
                Ok(_) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
