//! Incremental UTF-8 decoding across chunk boundaries.

use crate::error::{LanguageModelError, Result};

/// Decodes UTF-8 text that arrives in arbitrary byte chunks.
///
/// Bytes of a code point split across two chunks are held back until the
/// rest arrives, so decoded fragments always end on a character boundary.
/// Text before an invalid sequence is still returned; the error follows on
/// the next call.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    error: Option<LanguageModelError>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk. Returns an empty string when the chunk only
    /// extends a partial code point.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(chunk);

        let valid_up_to = match std::str::from_utf8(&buf) {
            Ok(_) => buf.len(),
            Err(e) => match e.error_len() {
                Some(_) => {
                    let err = LanguageModelError::Decode(format!(
                        "invalid UTF-8 sequence at byte {}",
                        e.valid_up_to()
                    ));
                    if e.valid_up_to() == 0 {
                        return Err(err);
                    }
                    self.error = Some(err);
                    buf.truncate(e.valid_up_to());
                    return String::from_utf8(buf)
                        .map_err(|e| LanguageModelError::Decode(e.to_string()));
                }
                None => e.valid_up_to(),
            },
        };

        self.pending = buf.split_off(valid_up_to);
        String::from_utf8(buf).map_err(|e| LanguageModelError::Decode(e.to_string()))
    }

    /// Take the error recorded after a valid prefix was returned, if any.
    pub fn take_error(&mut self) -> Option<LanguageModelError> {
        self.error.take()
    }

    /// Number of bytes held back waiting for the rest of a code point.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Signal end of input. Fails if a partial code point is still pending.
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let len = self.pending.len();
        self.pending.clear();
        Err(LanguageModelError::Decode(format!(
            "stream ended inside a multi-byte sequence ({len} trailing bytes)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_back_split_code_point() {
        let bytes = "héllo".as_bytes();
        let mut decoder = Utf8Decoder::new();

        assert_eq!(decoder.decode(&bytes[..2]).unwrap(), "h");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&bytes[2..]).unwrap(), "éllo");
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn four_byte_code_point_one_byte_at_a_time() {
        let bytes = "🦀".as_bytes();
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        for b in bytes {
            out.push_str(&decoder.decode(std::slice::from_ref(b)).unwrap());
        }
        assert_eq!(out, "🦀");
    }

    #[test]
    fn rejects_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert!(matches!(
            decoder.decode(&[0xFF, b'b']),
            Err(LanguageModelError::Decode(_))
        ));
    }

    #[test]
    fn valid_prefix_is_returned_before_the_error() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[b'a', 0xFF, b'b']).unwrap(), "a");
        assert_eq!(decoder.pending_len(), 0);
        assert!(matches!(
            decoder.decode(b""),
            Err(LanguageModelError::Decode(ref msg)) if msg.contains("byte 1")
        ));
        assert!(decoder.take_error().is_none());
    }

    #[test]
    fn split_code_point_before_invalid_byte_is_kept() {
        let bytes = "é".as_bytes();
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&bytes[..1]).unwrap(), "");
        assert_eq!(decoder.decode(&[bytes[1], 0xC0]).unwrap(), "é");
        assert!(decoder.take_error().is_some());
    }

    #[test]
    fn truncated_tail_fails_on_finish() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&"é".as_bytes()[..1]).unwrap(), "");
        assert!(decoder.finish().is_err());
        assert_eq!(decoder.pending_len(), 0);
    }
}
