//! CRC-16/CCITT-FALSE checksum over serialized payloads
//!
//! Polynomial 0x1021, initial value 0xFFFF, no input or output reflection.
//! The checksum covers every payload byte including the trailing `6304`
//! tag/length declaration, and is rendered as 4 uppercase hex digits.

use crate::{Error, Result};

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Checksum tag plus its fixed length declaration, always the final field
/// header of a payload
pub const CHECKSUM_TRAILER: &str = "6304";

/// Compute the CRC-16/CCITT-FALSE of `data`.
pub fn checksum(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Append the checksum field to a serialized payload body, producing the
/// final payload string.
pub fn append_checksum(body: &str) -> String {
    let mut payload = String::with_capacity(body.len() + 8);
    payload.push_str(body);
    payload.push_str(CHECKSUM_TRAILER);
    let crc = checksum(payload.as_bytes());
    payload.push_str(&format!("{crc:04X}"));
    payload
}

/// Verify the trailing 4-hex-digit checksum of a candidate payload:
/// recomputing the CRC over all but the last 4 characters must reproduce
/// exactly those 4 characters.
pub fn verify_checksum(payload: &str) -> Result<()> {
    if payload.len() < 8 {
        return Err(Error::MalformedPayload(
            "payload too short for a checksum field".to_string(),
        ));
    }
    let split = payload.len() - 4;
    let (body, found) = match (payload.get(..split), payload.get(split..)) {
        (Some(body), Some(found)) => (body, found),
        _ => {
            return Err(Error::MalformedPayload(
                "checksum field is not ASCII".to_string(),
            ))
        }
    };
    let expected = format!("{:04X}", checksum(body.as_bytes()));
    if found != expected {
        return Err(Error::ChecksumMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_check_value() {
        // CRC-16/CCITT-FALSE check value for the standard test vector
        assert_eq!(checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum(b""), 0xFFFF);
    }

    #[test]
    fn test_append_and_verify() {
        let payload = append_checksum("000201");
        assert_eq!(payload.len(), 6 + 8);
        assert!(payload.ends_with(|c: char| c.is_ascii_hexdigit()));
        verify_checksum(&payload).unwrap();
    }

    #[test]
    fn test_tampered_payload_fails() {
        let payload = append_checksum("000201");
        let tampered = payload.replace("000201", "000202");
        assert!(matches!(
            verify_checksum(&tampered),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            verify_checksum("6304"),
            Err(Error::MalformedPayload(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_checksum_roundtrip(body in "[ -~]{0,64}") {
            let payload = append_checksum(&body);
            prop_assert!(verify_checksum(&payload).is_ok());
        }
    }
}
