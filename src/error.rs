//! Error types for BR Code construction and validation

use thiserror::Error;

use crate::KeyType;

/// Result type alias for BR Code operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating inputs or building payloads
#[derive(Debug, Error)]
pub enum Error {
    /// Unrecognized key type name
    #[error("Unknown key type: {0}")]
    InvalidKeyType(String),

    /// Key fails its declared type's structural/check-digit validation
    #[error("Invalid {key_type} key: {value}")]
    InvalidKey {
        /// The declared key type
        key_type: KeyType,
        /// The rejected raw value
        value: String,
    },

    /// Merchant name exceeds the 25-character field bound
    #[error("Merchant name too long (max 25 characters): {0}")]
    InvalidName(String),

    /// Reference label exceeds the 20-character field bound
    #[error("Reference label too long (max 20 characters): {0}")]
    InvalidReference(String),

    /// Amount is not a parseable non-negative decimal, or is out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// TLV tag is not exactly two ASCII digits
    #[error("Invalid TLV tag: {0:?}")]
    InvalidTag(String),

    /// TLV value does not fit a two-digit decimal length declaration
    #[error("Value for tag {tag} is {len} bytes (max 99)")]
    ValueTooLong {
        /// Tag of the oversized field
        tag: String,
        /// Byte length of the serialized value
        len: usize,
    },

    /// Candidate payload cannot be parsed as TLV
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Trailing CRC does not match the payload bytes
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        /// Checksum recomputed from the payload bytes
        expected: String,
        /// Checksum found at the end of the payload
        found: String,
    },
}
