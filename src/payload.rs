//! BR Code assembly: field ordering, input validation, checksum
//!
//! One payload is built per (merchant, entry) pair: normalize name and
//! reference, validate the key per its declared type, parse the amount,
//! assemble the TLV tree in the fixed field order, serialize, append the
//! CRC. Identical inputs always yield an identical payload string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    crc, normalize, tlv, Error, PixKey, Result, COUNTRY_CODE, CURRENCY_BRL, DEFAULT_REFERENCE,
    MAX_MERCHANT_NAME, MAX_REFERENCE, MERCHANT_CATEGORY_CODE, MERCHANT_CITY,
    PAYLOAD_FORMAT_INDICATOR, PIX_GUI,
};

const TAG_PAYLOAD_FORMAT: &str = "00";
const TAG_MERCHANT_ACCOUNT: &str = "26";
const TAG_GUI: &str = "00";
const TAG_KEY: &str = "01";
const TAG_CATEGORY: &str = "52";
const TAG_CURRENCY: &str = "53";
const TAG_AMOUNT: &str = "54";
const TAG_COUNTRY: &str = "58";
const TAG_NAME: &str = "59";
const TAG_CITY: &str = "60";
const TAG_ADDITIONAL_DATA: &str = "62";
const TAG_REFERENCE: &str = "05";

/// The receiver side of a charge: display name (optional) and Pix key.
/// The merchant city is a fixed constant of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantInfo {
    /// Receiver display name; omitted from the payload when blank
    pub name: Option<String>,
    /// The receiver's Pix key
    pub key: PixKey,
}

impl MerchantInfo {
    /// Merchant with a key and no display name
    pub fn new(key: PixKey) -> Self {
        Self { name: None, key }
    }
}

/// One payer's reference label and amount, both optional raw form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Reference label; the `***` placeholder is used when absent
    pub reference: Option<String>,
    /// Amount in decimal form; tag 54 is omitted when absent or zero
    pub amount: Option<String>,
}

impl PaymentEntry {
    /// Entry with both a reference and an amount
    pub fn new(reference: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            amount: Some(amount.into()),
        }
    }
}

/// A finished BR Code payload string, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrCode {
    payload: String,
}

impl BrCode {
    /// Build the payload for one payment entry.
    ///
    /// Reports the first violated invariant per field; invalid data is never
    /// coerced into a best-effort payload.
    pub fn build(merchant: &MerchantInfo, entry: &PaymentEntry) -> Result<Self> {
        let name = normalize::normalize(merchant.name.as_deref().unwrap_or(""));
        if name.chars().count() > MAX_MERCHANT_NAME {
            return Err(Error::InvalidName(name));
        }

        if !merchant.key.is_valid() {
            return Err(Error::InvalidKey {
                key_type: merchant.key.key_type,
                value: merchant.key.raw.clone(),
            });
        }

        let reference = normalize::normalize_reference(entry.reference.as_deref().unwrap_or(""));
        if reference.chars().count() > MAX_REFERENCE {
            return Err(Error::InvalidReference(reference));
        }
        let reference = if reference.is_empty() {
            DEFAULT_REFERENCE.to_string()
        } else {
            reference
        };

        let amount = match entry.amount.as_deref() {
            None => None,
            Some(raw) => {
                let centavos = normalize::parse_amount(&normalize::normalize_amount(raw))?;
                // A zero amount means an open charge: tag 54 is omitted
                // entirely, never emitted as "0.00".
                (centavos > 0).then(|| normalize::format_amount(centavos))
            }
        };

        let mut fields = vec![
            tlv::Field::text(TAG_PAYLOAD_FORMAT, PAYLOAD_FORMAT_INDICATOR),
            tlv::Field::template(
                TAG_MERCHANT_ACCOUNT,
                vec![
                    tlv::Field::text(TAG_GUI, PIX_GUI),
                    tlv::Field::text(TAG_KEY, merchant.key.canonical()),
                ],
            ),
            tlv::Field::text(TAG_CATEGORY, MERCHANT_CATEGORY_CODE),
            tlv::Field::text(TAG_CURRENCY, CURRENCY_BRL),
        ];
        if let Some(amount) = amount {
            fields.push(tlv::Field::text(TAG_AMOUNT, amount));
        }
        fields.push(tlv::Field::text(TAG_COUNTRY, COUNTRY_CODE));
        if !name.is_empty() {
            fields.push(tlv::Field::text(TAG_NAME, name));
        }
        fields.push(tlv::Field::text(TAG_CITY, MERCHANT_CITY));
        fields.push(tlv::Field::template(
            TAG_ADDITIONAL_DATA,
            vec![tlv::Field::text(TAG_REFERENCE, reference)],
        ));

        let body = tlv::serialize_all(&fields)?;
        Ok(Self {
            payload: crc::append_checksum(&body),
        })
    }

    /// Build one payload per entry against a shared merchant, sequentially;
    /// the first invalid entry aborts the batch.
    pub fn build_all(merchant: &MerchantInfo, entries: &[PaymentEntry]) -> Result<Vec<Self>> {
        entries.iter().map(|entry| Self::build(merchant, entry)).collect()
    }

    /// The payload string, ready to be rendered as a QR image or copied.
    pub fn as_str(&self) -> &str {
        &self.payload
    }

    /// Consume self and return the payload string.
    pub fn into_string(self) -> String {
        self.payload
    }

    /// Decode the payload into its TLV field sequence.
    pub fn fields(&self) -> Result<Vec<tlv::Field>> {
        tlv::parse(&self.payload)
    }
}

impl fmt::Display for BrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.payload)
    }
}

impl FromStr for BrCode {
    type Err = Error;

    /// Accept an existing payload after verifying its checksum and TLV
    /// structure.
    fn from_str(s: &str) -> Result<Self> {
        crc::verify_checksum(s)?;
        tlv::parse(s)?;
        Ok(Self {
            payload: s.to_string(),
        })
    }
}
