//! # Static Pix BR Code payloads
//!
//! This crate builds the EMV-QR ("BR Code") payload strings used by static
//! Pix charges: a nested Tag-Length-Value structure terminated by a
//! CRC-16/CCITT-FALSE checksum, together with the key validation that gates
//! which value may occupy the payload's key field.
//!
//! ## Payload format
//!
//! ```text
//! 00020126330014BR.GOV.BCB.PIX011152998224725...63044D95
//! ```
//!
//! Each field is `tag (2 digits) + length (2-digit decimal byte count) +
//! value`; templates (merchant account information, additional data) nest the
//! same encoding inside their value. The final field is always the 4-digit
//! uppercase hex checksum.
//!
//! ## Example
//!
//! ```
//! use pix_brcode::{BrCode, KeyType, MerchantInfo, PaymentEntry, PixKey};
//!
//! let merchant = MerchantInfo {
//!     name: Some("Fulano".to_string()),
//!     key: PixKey::new(KeyType::Cpf, "529.982.247-25"),
//! };
//! let entry = PaymentEntry {
//!     reference: Some("Jogador 1".to_string()),
//!     amount: Some("10,50".to_string()),
//! };
//!
//! let code = BrCode::build(&merchant, &entry)?;
//! assert!(code.as_str().starts_with("000201"));
//! assert!(code.as_str().ends_with("4D95"));
//! # Ok::<(), pix_brcode::Error>(())
//! ```

mod crc;
mod error;
mod key;
mod normalize;
mod payload;
mod tlv;

pub use crc::{append_checksum, checksum, verify_checksum};
pub use error::{Error, Result};
pub use key::{
    validate_cnpj, validate_cpf, validate_email, validate_phone, KeyType, PixKey,
};
pub use normalize::{
    format_amount, normalize, normalize_amount, normalize_reference, parse_amount,
    MAX_AMOUNT_CENTAVOS,
};
pub use payload::{BrCode, MerchantInfo, PaymentEntry};
pub use tlv::{Field, Value};

/// Payload Format Indicator value (tag 00)
pub const PAYLOAD_FORMAT_INDICATOR: &str = "01";

/// Globally unique identifier of the Pix arrangement (tag 26, subfield 00)
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";

/// Merchant Category Code for uncategorized charges (tag 52)
pub const MERCHANT_CATEGORY_CODE: &str = "0000";

/// ISO 4217 numeric code for the Brazilian real (tag 53)
pub const CURRENCY_BRL: &str = "986";

/// ISO 3166-1 alpha-2 country code (tag 58)
pub const COUNTRY_CODE: &str = "BR";

/// Fixed merchant city (tag 60)
pub const MERCHANT_CITY: &str = "SAOPAULO";

/// Placeholder reference label used when no reference is supplied (tag 62-05)
pub const DEFAULT_REFERENCE: &str = "***";

/// Maximum merchant name length, in characters, after normalization
pub const MAX_MERCHANT_NAME: usize = 25;

/// Maximum reference label length, in characters, after normalization
pub const MAX_REFERENCE: usize = 20;
