/// Container log parsing and normalization
///
/// Turns one raw line written by a container runtime into a normalized
/// [`Message`]. Two encodings are understood:
///
/// - `formats/docker_json.rs`: Docker `json-file` lines, which may be partial
/// - `formats/cri.rs`: CRI plain text lines, never reported partial
///
/// [`parse_record`] picks the parser by sniffing the first byte.

pub mod traits;
pub mod formats;
pub mod model;
mod serde_utils;

pub use traits::LogParser;
pub use model::{LogFormat, Message, ParseError, ParseFailure, Parsed};

use formats::{CriParser, DockerJsonParser};
use crate::reader::RawRecord;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB

/// Parse a record with the parser its first byte selects.
pub fn parse_record(record: &RawRecord) -> Result<Parsed, ParseFailure> {
    match LogFormat::sniff(&record.content) {
        LogFormat::DockerJson => DockerJsonParser.parse(record),
        LogFormat::Cri => CriParser.parse(record),
    }
}
