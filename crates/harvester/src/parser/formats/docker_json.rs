use bytes::Bytes;
use serde::Deserialize;
use serde_json::Deserializer;

use crate::parser::model::parse_timestamp;
use crate::parser::traits::*;
use crate::reader::RawRecord;

/// One line written by Docker's `json-file` log driver.
///
/// `{"log":"1:M 09 Nov 13:27:36.276 # User requested shutdown...\n","stream":"stdout","time":"2017-11-09T13:27:36.277747246Z"}`
#[derive(Debug, Deserialize)]
struct DockerJsonLine {
    time: String,
    log: String,
    stream: String,
}

/// Docker JSON-lines parser
pub struct DockerJsonParser;

impl LogParser for DockerJsonParser {
    fn parse(&self, record: &RawRecord) -> Result<Parsed, ParseFailure> {
        // Only the first JSON value counts; anything after it is ignored
        let line = DockerJsonLine::deserialize(&mut Deserializer::from_slice(&record.content))?;

        let ts = parse_timestamp(LogFormat::DockerJson, &line.time)
            .map_err(|e| ParseFailure::with_stream(e, line.stream.as_str()))?;

        let partial = is_partial(&line.log);

        let mut message = Message::from_raw(record);
        message.set_stream(&line.stream);
        message.content = Bytes::from(line.log);
        message.ts = ts;

        Ok(Parsed { message, partial })
    }
}

/// Docker cuts lines longer than 16k into several records and only the last
/// one keeps the trailing newline. A `\` right before the newline means the
/// runtime cut on an escaped backslash, so the line still continues.
fn is_partial(log: &str) -> bool {
    let log = log.as_bytes();
    log.len() > 2 && (log[log.len() - 1] != b'\n' || log[log.len() - 2] == b'\\')
}
