use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::parser::model::parse_timestamp;
use crate::parser::traits::*;
use crate::reader::RawRecord;

/// One CRI log line, e.g.
///
/// `2017-09-12T22:32:21.212861448Z stdout 2017-09-12 22:32:21.212 [INFO][88] table.go 710: Invalidating dataplane cache`
#[derive(Debug)]
struct CriLine {
    ts: DateTime<Utc>,
    stream: String,
    log: Bytes,
}

impl CriLine {
    fn split(content: &Bytes) -> Result<Self, ParseError> {
        let first = find_space(content, 0).ok_or(ParseError::Format)?;
        let second = find_space(content, first + 1).ok_or(ParseError::Format)?;

        let ts = std::str::from_utf8(&content[..first])
            .map_err(|_| ParseError::NonUtf8Timestamp(LogFormat::Cri))?;
        let ts = parse_timestamp(LogFormat::Cri, ts)?;

        Ok(Self {
            ts,
            stream: String::from_utf8_lossy(&content[first + 1..second]).into_owned(),
            log: content.slice(second + 1..),
        })
    }
}

fn find_space(content: &[u8], from: usize) -> Option<usize> {
    content[from..]
        .iter()
        .position(|b| *b == b' ')
        .map(|i| from + i)
}

/// CRI plain text parser.
///
/// CRI records are always reported complete: only the Docker encoding's
/// partial convention is reassembled.
pub struct CriParser;

impl LogParser for CriParser {
    fn parse(&self, record: &RawRecord) -> Result<Parsed, ParseFailure> {
        let line = CriLine::split(&record.content)?;

        let mut message = Message::from_raw(record);
        message.set_stream(&line.stream);
        message.content = line.log;
        message.ts = line.ts;

        Ok(Parsed {
            message,
            partial: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(content: &'static [u8]) -> RawRecord {
        RawRecord {
            content: Bytes::from_static(content),
            ts: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            bytes: content.len(),
        }
    }

    #[test]
    fn test_parse_cri_line() {
        let raw = record(b"2017-09-12T22:32:21.212861448Z stdout hello world");
        let parsed = CriParser.parse(&raw).unwrap();

        assert_eq!(parsed.message.content.as_ref(), b"hello world");
        assert_eq!(parsed.message.stream(), Some("stdout"));
        assert_eq!(
            parsed.message.ts,
            DateTime::parse_from_rfc3339("2017-09-12T22:32:21.212861448Z").unwrap()
        );
        assert!(!parsed.partial);
    }

    #[test]
    fn test_payload_keeps_spaces_and_newline() {
        let raw = record(b"2017-09-12T22:32:21.212861448Z stderr 2017-09-12 22:32:21.212 [INFO][88] table.go 710: x\n");
        let parsed = CriParser.parse(&raw).unwrap();

        assert_eq!(parsed.message.stream(), Some("stderr"));
        assert_eq!(
            parsed.message.content.as_ref(),
            b"2017-09-12 22:32:21.212 [INFO][88] table.go 710: x\n"
        );
    }

    #[test]
    fn test_empty_payload() {
        let raw = record(b"2017-09-12T22:32:21Z stdout ");
        let parsed = CriParser.parse(&raw).unwrap();
        assert!(parsed.message.content.is_empty());
    }

    #[test]
    fn test_partial_tag_is_payload() {
        // The `P`/`F` tag of newer runtimes is not interpreted
        let raw = record(b"2017-09-12T22:32:21Z stdout P half a line");
        let parsed = CriParser.parse(&raw).unwrap();
        assert!(!parsed.partial);
        assert_eq!(parsed.message.content.as_ref(), b"P half a line");
    }

    #[test]
    fn test_too_few_fields_is_format_error() {
        for line in [&b"2017-09-12T22:32:21Z stdout"[..], b"justoneword", b""] {
            let raw = RawRecord {
                content: Bytes::copy_from_slice(line),
                ts: Utc::now(),
                bytes: line.len(),
            };
            let failure = CriParser.parse(&raw).unwrap_err();
            assert!(matches!(failure.error, ParseError::Format), "{:?}", line);
            assert_eq!(failure.stream, None);
        }
    }

    #[test]
    fn test_bad_timestamp_is_timestamp_error() {
        let raw = record(b"not-a-time stdout hello");
        let failure = CriParser.parse(&raw).unwrap_err();
        assert!(matches!(
            failure.error,
            ParseError::Timestamp { format: LogFormat::Cri, .. }
        ));
        assert_eq!(failure.stream, None);
    }

    #[test]
    fn test_non_utf8_timestamp() {
        let raw = record(b"\xFF\xFE stdout hello");
        let failure = CriParser.parse(&raw).unwrap_err();
        assert!(matches!(failure.error, ParseError::NonUtf8Timestamp(LogFormat::Cri)));
    }
}
