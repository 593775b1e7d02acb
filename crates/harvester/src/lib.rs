// Container log harvester: decodes Docker JSON-lines and CRI log files
// into normalized messages.

// Core
pub mod reader;
pub mod parser;
pub mod stream;

// Surroundings
pub mod conf;
pub mod runtime;

pub use parser::{LogFormat, Message, ParseError};
pub use reader::{LineReader, RawReader, RawRecord, ReadError};
pub use stream::{DecodeError, Decoder, StreamFilter};
