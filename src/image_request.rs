use base64::{engine::general_purpose::STANDARD, Engine};
use percent_encoding::percent_decode_str;
use serde::Serialize;

/// Request understood by the image handler: which object to load and which
/// edits to apply to it.
#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest<'a, E: ?Sized> {
    pub(crate) bucket: &'a str,
    pub(crate) key: &'a str,
    pub(crate) edits: &'a E,
}

impl<E> ImageRequest<'_, E>
where
    E: Serialize + ?Sized,
{
    /// Serialize the request to JSON and Base64 encode it.
    ///
    /// The standard alphabet is applied to the UTF-8 bytes of the JSON, so
    /// non-ASCII keys encode as multi-byte sequences.
    pub(crate) fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json))
    }
}

/// Turn a URL path into the object key it designates.
///
/// A single leading separator is stripped and percent-encoding is reversed.
/// Returns `None` when the path holds a malformed escape or does not decode
/// to UTF-8.
pub(crate) fn object_key(path: &str) -> Option<String> {
    let path = path.strip_prefix('/').unwrap_or(path);

    if !has_valid_escapes(path) {
        return None;
    }

    percent_decode_str(path)
        .decode_utf8()
        .ok()
        .map(|key| key.into_owned())
}

// `percent_decode_str` leaves malformed escapes as-is; reject them instead.
fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edits;

    #[test]
    fn strips_a_single_leading_slash() {
        assert_eq!(object_key("/folder/pic.jpg").as_deref(), Some("folder/pic.jpg"));
        assert_eq!(object_key("//pic.jpg").as_deref(), Some("/pic.jpg"));
        assert_eq!(object_key("pic.jpg").as_deref(), Some("pic.jpg"));
    }

    #[test]
    fn reverses_percent_encoding() {
        assert_eq!(
            object_key("/my%20folder/caf%C3%A9.png").as_deref(),
            Some("my folder/café.png")
        );
    }

    #[test]
    fn rejects_malformed_escapes() {
        assert_eq!(object_key("/100%"), None);
        assert_eq!(object_key("/a%2"), None);
        assert_eq!(object_key("/a%zz"), None);
    }

    #[test]
    fn rejects_non_utf8() {
        assert_eq!(object_key("/%FF"), None);
    }

    #[test]
    fn non_ascii_keys_encode_as_utf8() {
        let edits = Edits::new();
        let request = ImageRequest {
            bucket: "b",
            key: "café.jpg",
            edits: &edits,
        };

        assert_eq!(
            STANDARD.decode(request.encode().unwrap()).unwrap(),
            r#"{"bucket":"b","key":"café.jpg","edits":{}}"#.as_bytes()
        );
    }

    #[test]
    fn payload_field_order() {
        let edits = Edits::new().resize(10, 20);
        let request = ImageRequest {
            bucket: "b",
            key: "k.jpg",
            edits: &edits,
        };

        let decoded = STANDARD.decode(request.encode().unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            r#"{"bucket":"b","key":"k.jpg","edits":{"resize":{"width":10,"height":20}}}"#
        );
    }
}
