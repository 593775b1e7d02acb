use serde::Serializer;

/// Serialize a byte payload as a string, replacing invalid UTF-8 sequences.
pub fn serialize_bytes_lossy<S>(bytes: &bytes::Bytes, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn serialize(bytes: Bytes) -> String {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_bytes_lossy")]
            content: Bytes,
        }

        serde_json::to_string(&Wrapper { content: bytes }).unwrap()
    }

    #[test]
    fn test_serialize_utf8_payload() {
        assert_eq!(serialize(Bytes::from_static(b"hello\n")), r#"{"content":"hello\n"}"#);
    }

    #[test]
    fn test_serialize_invalid_utf8_is_replaced() {
        let json = serialize(Bytes::from_static(b"ok\xFF"));
        assert_eq!(json, "{\"content\":\"ok\u{FFFD}\"}");
    }
}
