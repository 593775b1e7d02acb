use thiserror::Error;

use crate::parser::{Message, ParseError};
use crate::reader::ReadError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("end of stream")]
    EndOfStream,

    #[error("upstream read failed: {0}")]
    Upstream(#[source] std::io::Error),

    /// The record could not be parsed. `message` holds what was produced
    /// anyway, usually the raw line itself.
    #[error("{source}")]
    Message {
        message: Box<Message>,
        #[source]
        source: ParseError,
    },
}

impl DecodeError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, DecodeError::EndOfStream)
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            DecodeError::Message { message, .. } => Some(message.as_ref()),
            _ => None,
        }
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            DecodeError::Message { message, .. } => Some(*message),
            _ => None,
        }
    }
}

impl From<ReadError> for DecodeError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::EndOfStream => DecodeError::EndOfStream,
            ReadError::Io(e) => DecodeError::Upstream(e),
        }
    }
}
