use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::serde_utils::serialize_bytes_lossy;
use crate::reader::RawRecord;

/// On-disk encodings a container runtime may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Docker `json-file` driver: one JSON object per line
    DockerJson,
    /// CRI plain text: `<timestamp> <stream> <log>`
    Cri,
}

impl LogFormat {
    /// Pick the encoding of a raw line by its first byte.
    pub fn sniff(content: &[u8]) -> Self {
        if content.starts_with(b"{") {
            LogFormat::DockerJson
        } else {
            LogFormat::Cri
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::DockerJson => "docker",
            LogFormat::Cri => "CRI",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("decoding docker JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid CRI log: expected `<timestamp> <stream> <log>`")]
    Format,

    #[error("parsing {format} timestamp {value:?}: {source}")]
    Timestamp {
        format: LogFormat,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("parsing {0} timestamp: not valid UTF-8")]
    NonUtf8Timestamp(LogFormat),
}

/// A log line normalized out of either runtime encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Event time taken from the record (read time until a parser replaces it)
    #[serde(rename = "@timestamp")]
    pub ts: DateTime<Utc>,

    /// Decoded payload, framing stripped
    #[serde(rename = "message", serialize_with = "serialize_bytes_lossy")]
    pub content: Bytes,

    /// Extra fields; always carries `stream` once parsed
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,

    /// Source bytes consumed to produce this message
    #[serde(skip)]
    pub bytes: usize,
}

impl Message {
    /// Wrap a raw record as-is. This is what a caller sees when a parser fails.
    pub fn from_raw(record: &RawRecord) -> Self {
        Self {
            ts: record.ts,
            content: record.content.clone(),
            fields: BTreeMap::new(),
            bytes: record.bytes,
        }
    }

    pub fn stream(&self) -> Option<&str> {
        self.fields.get("stream").and_then(Value::as_str)
    }

    pub(crate) fn set_stream(&mut self, stream: &str) {
        self.fields
            .insert("stream".to_string(), Value::String(stream.to_string()));
    }
}

/// Successful parse of one raw record.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub message: Message,
    /// The logical line continues in the next record
    pub partial: bool,
}

/// Failed parse. `stream` is whatever tag the parser read before failing.
#[derive(Debug)]
pub struct ParseFailure {
    pub error: ParseError,
    pub stream: Option<String>,
}

impl ParseFailure {
    pub fn new(error: ParseError) -> Self {
        Self { error, stream: None }
    }

    pub fn with_stream(error: ParseError, stream: impl Into<String>) -> Self {
        Self {
            error,
            stream: Some(stream.into()),
        }
    }
}

impl From<ParseError> for ParseFailure {
    fn from(error: ParseError) -> Self {
        Self::new(error)
    }
}

impl From<serde_json::Error> for ParseFailure {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ParseError::Decode(error))
    }
}

/// Parse an RFC3339 stamp into UTC.
pub(crate) fn parse_timestamp(format: LogFormat, value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| ParseError::Timestamp {
            format,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(content: &'static [u8]) -> RawRecord {
        RawRecord {
            content: Bytes::from_static(content),
            ts: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            bytes: content.len(),
        }
    }

    #[test]
    fn test_sniff_by_first_byte() {
        assert_eq!(LogFormat::sniff(br#"{"log":"x"}"#), LogFormat::DockerJson);
        assert_eq!(LogFormat::sniff(b"2017-09-12T22:32:21Z stdout x"), LogFormat::Cri);
        assert_eq!(LogFormat::sniff(b" {\"log\":\"x\"}"), LogFormat::Cri);
        assert_eq!(LogFormat::sniff(b""), LogFormat::Cri);
    }

    #[test]
    fn test_from_raw_keeps_record() {
        let raw = record(b"hello\n");
        let msg = Message::from_raw(&raw);
        assert_eq!(msg.content.as_ref(), b"hello\n");
        assert_eq!(msg.ts, raw.ts);
        assert_eq!(msg.bytes, 6);
        assert!(msg.fields.is_empty());
        assert_eq!(msg.stream(), None);
    }

    #[test]
    fn test_parse_timestamp_nanos() {
        let ts = parse_timestamp(LogFormat::Cri, "2017-09-12T22:32:21.212861448Z").unwrap();
        assert_eq!(ts.timestamp(), 1_505_255_541);
        assert_eq!(ts.timestamp_subsec_nanos(), 212_861_448);
    }

    #[test]
    fn test_parse_timestamp_offset_normalized_to_utc() {
        let ts = parse_timestamp(LogFormat::DockerJson, "2017-09-13T00:32:21+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2017, 9, 12, 22, 32, 21).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp(LogFormat::Cri, "yesterday").unwrap_err();
        assert!(matches!(err, ParseError::Timestamp { format: LogFormat::Cri, .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_message_serializes_flat() {
        let mut msg = Message::from_raw(&record(b"abc\n"));
        msg.set_stream("stderr");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message"], "abc\n");
        assert_eq!(json["stream"], "stderr");
        assert_eq!(json["@timestamp"], "2024-01-01T00:00:00Z");
        assert!(json.get("bytes").is_none());
    }
}
