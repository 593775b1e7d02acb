pub use super::model::{LogFormat, Message, ParseError, ParseFailure, Parsed};
use crate::reader::RawRecord;

pub trait LogParser: Send + Sync {
    /// parse one raw record into a normalized message and its partial flag
    fn parse(&self, record: &RawRecord) -> Result<Parsed, ParseFailure>;
}
