use bytes::BytesMut;
use tracing::debug;

use super::error::DecodeError;
use super::filter::StreamFilter;
use crate::conf::ContainersConfig;
use crate::parser::{self, Message, ParseFailure, Parsed, MAX_LINE_SIZE};
use crate::reader::RawReader;

/// Pulls raw records and yields normalized, stream-filtered messages,
/// joining Docker partial lines when `concat_partial` is set.
///
/// One `next_message()` call may consume several raw records: filtered out
/// records and partial runs are absorbed until a message can be returned.
/// A partial run is emitted early once it holds `max_bytes`.
pub struct Decoder<R> {
    reader: R,
    filter: StreamFilter,
    concat_partial: bool,
    max_bytes: usize,
    /// Content of the partial run in progress
    partial: BytesMut,
    /// Source bytes of records consumed but not yet emitted
    pending_bytes: usize,
}

impl<R: RawReader> Decoder<R> {
    pub fn new(reader: R, filter: StreamFilter, concat_partial: bool) -> Self {
        Self {
            reader,
            filter,
            concat_partial,
            max_bytes: MAX_LINE_SIZE,
            partial: BytesMut::new(),
            pending_bytes: 0,
        }
    }

    pub fn from_config(reader: R, config: &ContainersConfig) -> Self {
        Self::new(reader, config.stream, config.concat_partial)
            .with_max_bytes(config.max_line_bytes)
    }

    /// Cap on the content buffered for one partial run.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes.max(1);
        self
    }

    pub fn stream_filter(&self) -> StreamFilter {
        self.filter
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn concat_partial(&self) -> bool {
        self.concat_partial
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Return the next complete message.
    ///
    /// Upstream end of stream and read failures are returned as is; a
    /// partial run still buffered at that point is discarded. A parse
    /// failure comes back as `DecodeError::Message` carrying the message
    /// produced for that record, and leaves the decoder usable.
    pub fn next_message(&mut self) -> Result<Message, DecodeError> {
        loop {
            let record = match self.reader.next_record() {
                Ok(record) => record,
                Err(e) => {
                    self.reset();
                    return Err(e.into());
                }
            };

            let (mut message, partial, error) = match parser::parse_record(&record) {
                Ok(Parsed { message, partial }) => (message, partial, None),
                Err(ParseFailure { error, stream }) => {
                    let mut message = Message::from_raw(&record);
                    if let Some(stream) = stream {
                        message.set_stream(&stream);
                    }
                    (message, false, Some(error))
                }
            };

            if !self.filter.accepts(message.stream()) {
                debug!(
                    filter = %self.filter,
                    stream = message.stream().unwrap_or(""),
                    "skipping record from filtered stream"
                );
                self.pending_bytes += message.bytes;
                continue;
            }

            if self.concat_partial {
                if partial {
                    self.partial.extend_from_slice(&message.content);
                    if self.partial.len() < self.max_bytes {
                        self.pending_bytes += message.bytes;
                        debug!(buffered = self.partial.len(), "buffering partial record");
                        continue;
                    }
                    debug!(
                        buffered = self.partial.len(),
                        max_bytes = self.max_bytes,
                        "partial record reached size limit, emitting"
                    );
                    message.content = self.partial.split().freeze();
                } else if !self.partial.is_empty() {
                    self.partial.extend_from_slice(&message.content);
                    message.content = self.partial.split().freeze();
                }
            }
            message.bytes += std::mem::take(&mut self.pending_bytes);

            return match error {
                Some(source) => Err(DecodeError::Message {
                    message: Box::new(message),
                    source,
                }),
                None => Ok(message),
            };
        }
    }

    fn reset(&mut self) {
        if !self.partial.is_empty() {
            debug!(
                dropped = self.partial.len(),
                "stream ended inside a partial record, discarding buffered content"
            );
        }
        self.partial.clear();
        self.pending_bytes = 0;
    }
}

impl<R: RawReader> Iterator for Decoder<R> {
    type Item = Result<Message, DecodeError>;

    /// Ends at upstream end of stream; every other outcome is yielded.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_message() {
            Err(DecodeError::EndOfStream) => None,
            other => Some(other),
        }
    }
}
