//! Binary-to-text conversion for the JSON-only transport.
//!
//! The transport carries JSON payloads, so file content crosses it as base64
//! text: the responder encodes on read and decodes on write, the panel
//! decodes downloads and encodes uploads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::error::ExplorerError;

/// Encodes arbitrary bytes as standard base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 text back into bytes.
///
/// Malformed input fails with [`ExplorerError::Decode`]; content is never
/// truncated or substituted.
pub fn decode(content: &str) -> Result<Vec<u8>, ExplorerError> {
    Ok(STANDARD.decode(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn every_byte_value_round_trips() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(decode("not base64!!").is_err());
        assert!(decode("AAA=AAA").is_err());
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_content(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        }
    }
}
