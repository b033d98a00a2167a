//! Pix key types and validation
//!
//! A Pix key is a raw string plus a declared [`KeyType`]. Validation is a
//! pure predicate per type: CPF and CNPJ run their mod-11 check-digit
//! arithmetic, phone numbers are checked structurally against the Brazilian
//! numbering plan, e-mail addresses against an RFC-5322-lite pattern, and
//! random (EVP) keys are accepted as opaque tokens.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The five Pix key types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    /// 11-digit individual taxpayer number
    #[serde(rename = "CPF")]
    Cpf,
    /// 14-digit company taxpayer number
    #[serde(rename = "CNPJ")]
    Cnpj,
    /// Mobile phone number
    #[serde(rename = "CELULAR")]
    Phone,
    /// E-mail address
    #[serde(rename = "EMAIL")]
    Email,
    /// Opaque bank-issued random key (EVP)
    #[serde(rename = "ALEATORIA")]
    Random,
}

impl KeyType {
    /// Canonical spelling of this key type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Phone => "CELULAR",
            Self::Email => "EMAIL",
            Self::Random => "ALEATORIA",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_uppercase().as_str() {
            "CPF" => Ok(Self::Cpf),
            "CNPJ" => Ok(Self::Cnpj),
            "CELULAR" => Ok(Self::Phone),
            "EMAIL" => Ok(Self::Email),
            "ALEATORIA" => Ok(Self::Random),
            _ => Err(Error::InvalidKeyType(s.to_string())),
        }
    }
}

/// A raw key value plus its declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixKey {
    /// Declared key type
    pub key_type: KeyType,
    /// Raw key value as entered
    pub raw: String,
}

impl PixKey {
    /// Create a key from its declared type and raw value
    pub fn new(key_type: KeyType, raw: impl Into<String>) -> Self {
        Self {
            key_type,
            raw: raw.into(),
        }
    }

    /// Whether the raw value passes the validator for its declared type
    pub fn is_valid(&self) -> bool {
        match self.key_type {
            KeyType::Cpf => validate_cpf(&self.raw),
            KeyType::Cnpj => validate_cnpj(&self.raw),
            KeyType::Phone => validate_phone(&self.raw),
            KeyType::Email => validate_email(&self.raw),
            KeyType::Random => true,
        }
    }

    /// Canonical payload form of the key, as embedded under tag 26-01:
    /// lowercased and trimmed; document and phone keys reduced to digits,
    /// phone keys prefixed with the +55 country code.
    pub fn canonical(&self) -> String {
        let value = self.raw.trim().to_lowercase();
        match self.key_type {
            KeyType::Cpf | KeyType::Cnpj => keep_digits(&value),
            KeyType::Phone => format!("+55{}", keep_digits(&value)),
            KeyType::Email | KeyType::Random => value,
        }
    }
}

/// DDD area codes of the Brazilian numbering plan
const DDD_CODES: [u32; 67] = [
    11, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 24, 27, 28, 31, 32, 33, 34, 35, 37, 38, 41, 42,
    43, 44, 45, 46, 47, 48, 49, 51, 53, 54, 55, 61, 62, 64, 63, 65, 66, 67, 68, 69, 71, 73, 74,
    75, 77, 79, 81, 82, 83, 84, 85, 86, 87, 88, 89, 91, 92, 93, 94, 95, 96, 97, 98, 99,
];

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}(\.[0-9]{1,3}){3}\])|(([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("e-mail pattern compiles")
});

fn digits_of(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn keep_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Validate a CPF (11-digit individual taxpayer number).
///
/// Non-digit characters are stripped first. The eleven repeated-digit
/// sequences are rejected outright; both mod-11 check digits must match.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits = digits_of(cpf);
    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    // Check digit over the first `n` digits, weights n+1 down to 2
    let check_digit = |n: usize| -> u32 {
        let sum: u32 = digits[..n]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (n as u32 + 1 - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            rest => rest,
        }
    };

    check_digit(9) == digits[9] && check_digit(10) == digits[10]
}

/// Validate a CNPJ (14-digit company taxpayer number).
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits = digits_of(cnpj);
    if digits.len() != 14 || all_same(&digits) {
        return false;
    }

    cnpj_check_digit(&digits[..12]) == digits[12] && cnpj_check_digit(&digits[..13]) == digits[13]
}

// Weighted sum right-to-left with weights cycling 2 up to 9.
fn cnpj_check_digit(prefix: &[u32]) -> u32 {
    let mut weight = 2;
    let mut sum = 0;
    for digit in prefix.iter().rev() {
        sum += digit * weight;
        weight += 1;
        if weight > 9 {
            weight = 2;
        }
    }
    match sum % 11 {
        0 | 1 => 0,
        rest => 11 - rest,
    }
}

/// Validate a Brazilian mobile phone number.
///
/// Accepts 10 or 11 digits after stripping formatting. An 11-digit number
/// must carry the mobile `9` prefix after the area code; a 10-digit number
/// must start its subscriber part with 2-5 or 7. The two leading digits must
/// be an assigned DDD area code.
pub fn validate_phone(phone: &str) -> bool {
    let digits = digits_of(phone);
    if digits.len() != 10 && digits.len() != 11 {
        return false;
    }
    if digits.len() == 11 && digits[2] != 9 {
        return false;
    }
    if all_same(&digits) {
        return false;
    }
    if !DDD_CODES.contains(&(digits[0] * 10 + digits[1])) {
        return false;
    }
    if digits.len() == 10 && !matches!(digits[2], 2..=5 | 7) {
        return false;
    }
    true
}

/// Validate an e-mail address against an RFC-5322-lite pattern,
/// case-insensitively.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(&email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("111.444.777-35"));
    }

    #[test]
    fn test_cpf_check_digit_mutations() {
        assert!(validate_cpf("52998224725"));
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("52998224735"));
        assert!(!validate_cpf("52998224726"));
    }

    #[test]
    fn test_cpf_structural_rejections() {
        assert!(!validate_cpf(""));
        assert!(!validate_cpf("5299822472"));
        assert!(!validate_cpf("529982247255"));
        for d in 0..10 {
            assert!(!validate_cpf(&d.to_string().repeat(11)));
        }
    }

    #[test]
    fn test_valid_cnpj() {
        assert!(validate_cnpj("11222333000181"));
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("11444777000161"));
    }

    #[test]
    fn test_cnpj_rejections() {
        assert!(!validate_cnpj(""));
        assert!(!validate_cnpj("11222333000182"));
        assert!(!validate_cnpj("1122233300018"));
        for d in 0..10 {
            assert!(!validate_cnpj(&d.to_string().repeat(14)));
        }
    }

    #[test]
    fn test_valid_phone() {
        assert!(validate_phone("11987654321"));
        assert!(validate_phone("(11) 98765-4321"));
        assert!(validate_phone("21912345678"));
        // 10-digit number with an accepted subscriber prefix
        assert!(validate_phone("1139876543"));
    }

    #[test]
    fn test_phone_rejections() {
        // unassigned area code
        assert!(!validate_phone("2098765432"));
        // 11 digits without the mobile 9 prefix
        assert!(!validate_phone("11887654321"));
        // 10 digits with a subscriber prefix outside 2-5/7
        assert!(!validate_phone("1198765432"));
        // wrong lengths
        assert!(!validate_phone("119876543"));
        assert!(!validate_phone("119876543210"));
        // repeated digits
        assert!(!validate_phone("9999999999"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email("fulano.tal@example.com"));
        assert!(validate_email("FULANO@EXAMPLE.COM.BR"));
        assert!(validate_email("user+tag@sub.example.org"));
        assert!(validate_email("user@[192.168.0.1]"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a@b.c"));
        assert!(!validate_email("two words@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_random_key_always_valid() {
        let key = PixKey::new(KeyType::Random, "123e4567-e89b-12d3-a456-426614174000");
        assert!(key.is_valid());
        assert!(PixKey::new(KeyType::Random, "").is_valid());
    }

    #[test]
    fn test_key_type_from_str() {
        assert_eq!("CPF".parse::<KeyType>().unwrap(), KeyType::Cpf);
        assert_eq!("celular".parse::<KeyType>().unwrap(), KeyType::Phone);
        assert_eq!("Aleatoria".parse::<KeyType>().unwrap(), KeyType::Random);
        assert!(matches!(
            "PIX".parse::<KeyType>(),
            Err(Error::InvalidKeyType(_))
        ));
    }

    #[test]
    fn test_canonical_forms() {
        let cpf = PixKey::new(KeyType::Cpf, "529.982.247-25");
        assert_eq!(cpf.canonical(), "52998224725");

        let phone = PixKey::new(KeyType::Phone, "(11) 98765-4321");
        assert_eq!(phone.canonical(), "+5511987654321");

        let email = PixKey::new(KeyType::Email, " Fulano@Example.COM ");
        assert_eq!(email.canonical(), "fulano@example.com");
    }

    #[test]
    fn test_key_type_serde_spellings() {
        let json = serde_json::to_string(&KeyType::Phone).unwrap();
        assert_eq!(json, "\"CELULAR\"");
        let back: KeyType = serde_json::from_str("\"ALEATORIA\"").unwrap();
        assert_eq!(back, KeyType::Random);
    }
}
