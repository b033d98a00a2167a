//! Tag-Length-Value encoding for EMV-QR payloads
//!
//! Every field serializes as `tag (2 digits) + length (2-digit decimal byte
//! count) + value`; a template field's value is the concatenation of its
//! children's serialized forms. Lengths are always recomputed from content,
//! never stored.

use crate::{Error, Result};

/// Tags whose value is a nested field sequence (merchant account
/// information and the additional data field template)
const TEMPLATE_TAGS: [&str; 2] = ["26", "62"];

/// A field value: raw text or an ordered sequence of nested fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw text value
    Text(String),
    /// Nested template value
    Template(Vec<Field>),
}

/// One Tag-Length-Value field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: String,
    value: Value,
}

impl Field {
    /// Create a text field. The tag must be two ASCII digits.
    pub fn text(tag: &str, value: impl Into<String>) -> Self {
        Self {
            tag: tag.to_string(),
            value: Value::Text(value.into()),
        }
    }

    /// Create a template field holding nested fields.
    pub fn template(tag: &str, children: Vec<Field>) -> Self {
        Self {
            tag: tag.to_string(),
            value: Value::Template(children),
        }
    }

    /// The field's two-digit tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The field's value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Text content, if this is a text field
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            Value::Text(s) => Some(s),
            Value::Template(_) => None,
        }
    }

    /// Nested fields, if this is a template
    pub fn children(&self) -> Option<&[Field]> {
        match &self.value {
            Value::Text(_) => None,
            Value::Template(children) => Some(children),
        }
    }

    /// Serialize this field, recomputing lengths from content.
    pub fn serialize(&self) -> Result<String> {
        if !is_tag(&self.tag) {
            return Err(Error::InvalidTag(self.tag.clone()));
        }
        let value = match &self.value {
            Value::Text(text) => text.clone(),
            Value::Template(children) => serialize_all(children)?,
        };
        let len = value.len();
        if len > 99 {
            return Err(Error::ValueTooLong {
                tag: self.tag.clone(),
                len,
            });
        }
        Ok(format!("{}{:02}{}", self.tag, len, value))
    }
}

/// Serialize an ordered field sequence into a flat string.
pub fn serialize_all(fields: &[Field]) -> Result<String> {
    let mut out = String::new();
    for field in fields {
        out.push_str(&field.serialize()?);
    }
    Ok(out)
}

/// Parse a candidate payload into its field sequence, recursing into the
/// template tags 26 and 62. Rejects truncated fields and non-numeric
/// tag/length headers. Checksum verification is a separate step (see
/// [`crate::verify_checksum`]).
pub fn parse(payload: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < payload.len() {
        let tag = payload
            .get(pos..pos + 2)
            .filter(|t| is_tag(t))
            .ok_or_else(|| Error::MalformedPayload(format!("bad tag at offset {pos}")))?;
        pos += 2;

        let len_digits = payload
            .get(pos..pos + 2)
            .filter(|l| l.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                Error::MalformedPayload(format!("bad length for tag {tag} at offset {pos}"))
            })?;
        let len: usize = len_digits
            .parse()
            .map_err(|_| Error::MalformedPayload(format!("bad length for tag {tag}")))?;
        pos += 2;

        let value = payload
            .get(pos..pos + len)
            .ok_or_else(|| Error::MalformedPayload(format!("field {tag} truncated")))?;
        pos += len;

        if TEMPLATE_TAGS.contains(&tag) {
            fields.push(Field {
                tag: tag.to_string(),
                value: Value::Template(parse(value)?),
            });
        } else {
            fields.push(Field::text(tag, value));
        }
    }

    Ok(fields)
}

fn is_tag(tag: &str) -> bool {
    tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_text_field() {
        let field = Field::text("00", "01");
        assert_eq!(field.serialize().unwrap(), "000201");
    }

    #[test]
    fn test_serialize_template_lengths() {
        let field = Field::template(
            "26",
            vec![
                Field::text("00", "BR.GOV.BCB.PIX"),
                Field::text("01", "52998224725"),
            ],
        );
        assert_eq!(
            field.serialize().unwrap(),
            "26330014BR.GOV.BCB.PIX011152998224725"
        );
    }

    #[test]
    fn test_length_counts_utf8_bytes() {
        // "ç" is two bytes in UTF-8
        let field = Field::text("59", "ça");
        assert_eq!(field.serialize().unwrap(), "5903ça");
    }

    #[test]
    fn test_value_too_long() {
        let field = Field::text("59", "x".repeat(100));
        assert!(matches!(
            field.serialize(),
            Err(Error::ValueTooLong { len: 100, .. })
        ));
    }

    #[test]
    fn test_invalid_tag() {
        let field = Field::text("6A", "x");
        assert!(matches!(field.serialize(), Err(Error::InvalidTag(_))));
    }

    #[test]
    fn test_parse_roundtrip() {
        let fields = vec![
            Field::text("00", "01"),
            Field::template(
                "26",
                vec![
                    Field::text("00", "BR.GOV.BCB.PIX"),
                    Field::text("01", "52998224725"),
                ],
            ),
            Field::text("53", "986"),
        ];
        let serialized = serialize_all(&fields).unwrap();
        assert_eq!(parse(&serialized).unwrap(), fields);
    }

    #[test]
    fn test_parse_truncated_field() {
        assert!(matches!(
            parse("5905Ful"),
            Err(Error::MalformedPayload(_))
        ));
        assert!(matches!(parse("59"), Err(Error::MalformedPayload(_))));
    }

    #[test]
    fn test_parse_bad_headers() {
        assert!(matches!(parse("5x0201"), Err(Error::MalformedPayload(_))));
        assert!(matches!(parse("59+401"), Err(Error::MalformedPayload(_))));
    }
}
