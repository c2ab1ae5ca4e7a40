// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DER value tree over the `der` crate.
//
// Covers exactly what the key containers use: INTEGER (non-negative,
// arbitrary precision), OCTET STRING, BIT STRING (byte-aligned), OBJECT
// IDENTIFIER, NULL and SEQUENCE.  Tag/length handling and the canonical-form
// checks (definite minimal lengths, minimal integers, no trailing data) come
// from `der`; this module narrows the grammar and maps failures onto
// `MalformedEncoding`.

use der::asn1::{AnyRef, BitStringRef, Null, ObjectIdentifier, OctetStringRef, UintRef};
use der::{Decode, Encode, Reader, SliceReader, Tag, Tagged};
use keysync_core::error::{KeysyncError, Result};
use num_bigint::BigUint;
use tracing::debug;

/// Deepest SEQUENCE nesting accepted by the decoder. Key containers need 3.
const MAX_DEPTH: usize = 8;

/// A decoded DER value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerValue {
    Integer(BigUint),
    OctetString(Vec<u8>),
    /// Payload of a BIT STRING with zero unused bits; the count byte is
    /// stripped on decode and added back on encode.
    BitString(Vec<u8>),
    ObjectIdentifier(ObjectIdentifier),
    Null,
    Sequence(Vec<DerValue>),
}

impl From<BigUint> for DerValue {
    fn from(value: BigUint) -> Self {
        Self::Integer(value)
    }
}

impl From<&BigUint> for DerValue {
    fn from(value: &BigUint) -> Self {
        Self::Integer(value.clone())
    }
}

impl DerValue {
    /// ASN.1 name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::OctetString(_) => "OCTET STRING",
            Self::BitString(_) => "BIT STRING",
            Self::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Self::Null => "NULL",
            Self::Sequence(_) => "SEQUENCE",
        }
    }

    fn unexpected(&self, expected: &str) -> KeysyncError {
        KeysyncError::malformed(format!("expected {expected}, found {}", self.kind_name()))
    }

    pub fn into_integer(self) -> Result<BigUint> {
        match self {
            Self::Integer(v) => Ok(v),
            other => Err(other.unexpected("INTEGER")),
        }
    }

    pub fn into_octet_string(self) -> Result<Vec<u8>> {
        match self {
            Self::OctetString(v) => Ok(v),
            other => Err(other.unexpected("OCTET STRING")),
        }
    }

    pub fn into_bit_string(self) -> Result<Vec<u8>> {
        match self {
            Self::BitString(v) => Ok(v),
            other => Err(other.unexpected("BIT STRING")),
        }
    }

    pub fn into_object_identifier(self) -> Result<ObjectIdentifier> {
        match self {
            Self::ObjectIdentifier(v) => Ok(v),
            other => Err(other.unexpected("OBJECT IDENTIFIER")),
        }
    }

    pub fn into_sequence(self) -> Result<Vec<DerValue>> {
        match self {
            Self::Sequence(v) => Ok(v),
            other => Err(other.unexpected("SEQUENCE")),
        }
    }
}

/// Map a `der` failure onto `MalformedEncoding`.
pub(crate) fn der_error(error_stack: der::Error) -> KeysyncError {
    debug!(?error_stack, "DER rejected");
    KeysyncError::malformed(error_stack.to_string())
}

/// Borrow big-endian magnitude bytes as a DER unsigned INTEGER.
pub(crate) fn uint_ref(bytes: &[u8]) -> Result<UintRef<'_>> {
    UintRef::new(bytes).map_err(der_error)
}

pub(crate) fn biguint(value: UintRef<'_>) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// DER-encode a single value.
///
/// Fails only when a value is too large for a DER length.
pub fn encode(value: &DerValue) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(value, &mut out)?;
    Ok(out)
}

/// DER-encode `values` as the fields of one SEQUENCE.
pub fn build_sequence(values: &[DerValue]) -> Result<Vec<u8>> {
    let content = sequence_content(values)?;
    AnyRef::new(Tag::Sequence, &content)
        .and_then(|sequence| sequence.to_der())
        .map_err(der_error)
}

fn sequence_content(values: &[DerValue]) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    for value in values {
        encode_into(value, &mut content)?;
    }
    Ok(content)
}

fn encode_into(value: &DerValue, out: &mut Vec<u8>) -> Result<()> {
    let written = match value {
        DerValue::Integer(v) => {
            // to_bytes_be() yields [0] for zero; UintRef adds the sign octet.
            let magnitude = v.to_bytes_be();
            uint_ref(&magnitude)?.encode_to_vec(out)
        }
        DerValue::OctetString(bytes) => {
            OctetStringRef::new(bytes).and_then(|octets| octets.encode_to_vec(out))
        }
        DerValue::BitString(bytes) => {
            BitStringRef::from_bytes(bytes).and_then(|bits| bits.encode_to_vec(out))
        }
        DerValue::ObjectIdentifier(oid) => oid.encode_to_vec(out),
        DerValue::Null => Null.encode_to_vec(out),
        DerValue::Sequence(values) => {
            let content = sequence_content(values)?;
            AnyRef::new(Tag::Sequence, &content).and_then(|sequence| sequence.encode_to_vec(out))
        }
    };
    written.map(|_| ()).map_err(der_error)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode exactly one DER value occupying all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<DerValue> {
    let any = AnyRef::from_der(bytes).map_err(der_error)?;
    from_any(any, 0)
}

/// Decode `bytes` as one SEQUENCE and return its fields in order.
pub fn parse_sequence(bytes: &[u8]) -> Result<Vec<DerValue>> {
    decode(bytes)?.into_sequence()
}

/// Narrow an already-framed value (e.g. AlgorithmIdentifier parameters) to
/// the supported grammar.
pub(crate) fn from_any(any: AnyRef<'_>, depth: usize) -> Result<DerValue> {
    match any.tag() {
        Tag::Integer => {
            let value = any.decode_as::<UintRef<'_>>().map_err(der_error)?;
            Ok(DerValue::Integer(biguint(value)))
        }
        Tag::OctetString => Ok(DerValue::OctetString(any.value().to_vec())),
        Tag::BitString => {
            let bits = any.decode_as::<BitStringRef<'_>>().map_err(der_error)?;
            match bits.as_bytes() {
                Some(payload) => Ok(DerValue::BitString(payload.to_vec())),
                None => Err(KeysyncError::malformed(format!(
                    "BIT STRING with {} unused bits cannot carry a DER payload",
                    bits.unused_bits()
                ))),
            }
        }
        Tag::ObjectIdentifier => any
            .decode_as::<ObjectIdentifier>()
            .map(DerValue::ObjectIdentifier)
            .map_err(der_error),
        Tag::Null => any
            .decode_as::<Null>()
            .map(|_| DerValue::Null)
            .map_err(der_error),
        Tag::Sequence => {
            if depth >= MAX_DEPTH {
                return Err(KeysyncError::malformed("SEQUENCE nesting too deep"));
            }
            let mut reader = SliceReader::new(any.value()).map_err(der_error)?;
            let mut fields = Vec::new();
            while !reader.is_finished() {
                let field = AnyRef::decode(&mut reader).map_err(der_error)?;
                fields.push(from_any(field, depth + 1)?);
            }
            Ok(DerValue::Sequence(fields))
        }
        other => Err(KeysyncError::malformed(format!("unexpected {other} value"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: u32) -> DerValue {
        DerValue::Integer(BigUint::from(v))
    }

    fn is_malformed(result: Result<DerValue>) -> bool {
        matches!(result, Err(KeysyncError::MalformedEncoding(_)))
    }

    #[test]
    fn integer_encoding_is_minimal() {
        assert_eq!(encode(&int(0)).unwrap(), [0x02, 0x01, 0x00]);
        assert_eq!(encode(&int(127)).unwrap(), [0x02, 0x01, 0x7f]);
        // High bit set needs a leading zero to stay non-negative.
        assert_eq!(encode(&int(128)).unwrap(), [0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode(&int(256)).unwrap(), [0x02, 0x02, 0x01, 0x00]);
        assert_eq!(decode(&[0x02, 0x02, 0x00, 0x80]).unwrap(), int(128));
    }

    #[test]
    fn known_oids() {
        let rsa = DerValue::ObjectIdentifier(ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1"));
        assert_eq!(
            encode(&rsa).unwrap(),
            [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01]
        );
        let dsa = DerValue::ObjectIdentifier(ObjectIdentifier::new_unwrap("1.2.840.10040.4.1"));
        let bytes = [0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x38, 0x04, 0x01];
        assert_eq!(encode(&dsa).unwrap(), bytes);
        assert_eq!(decode(&bytes).unwrap(), dsa);
    }

    #[test]
    fn long_form_length() {
        let value = DerValue::OctetString(vec![0xaa; 200]);
        let bytes = encode(&value).unwrap();
        assert_eq!(&bytes[..3], &[0x04, 0x81, 0xc8]);
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn nested_sequence() {
        let values = vec![
            int(0),
            DerValue::Sequence(vec![DerValue::Null, DerValue::BitString(vec![1, 2])]),
        ];
        let bytes = build_sequence(&values).unwrap();
        assert_eq!(
            bytes,
            [0x30, 0x0c, 0x02, 0x01, 0x00, 0x30, 0x07, 0x05, 0x00, 0x03, 0x03, 0x00, 0x01, 0x02]
        );
        assert_eq!(parse_sequence(&bytes).unwrap(), values);
    }

    #[test]
    fn bit_string_strips_unused_bits_byte() {
        let value = decode(&[0x03, 0x04, 0x00, 0x02, 0x01, 0x05]).unwrap();
        let payload = value.into_bit_string().unwrap();
        assert_eq!(decode(&payload).unwrap(), int(5));
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(is_malformed(decode(&[0x02, 0x05, 0x01])));
        assert!(is_malformed(decode(&[0x30])));
        assert!(is_malformed(decode(&[])));
    }

    #[test]
    fn rejects_non_der_forms() {
        // indefinite length
        assert!(is_malformed(decode(&[0x30, 0x80, 0x00, 0x00])));
        // long form for a short length
        assert!(is_malformed(decode(&[0x04, 0x81, 0x01, 0xff])));
        // leading zero on a small integer
        assert!(is_malformed(decode(&[0x02, 0x02, 0x00, 0x01])));
        // negative integer
        assert!(is_malformed(decode(&[0x02, 0x01, 0xff])));
        // NULL with content
        assert!(is_malformed(decode(&[0x05, 0x01, 0x00])));
    }

    #[test]
    fn rejects_unknown_tag_and_trailing_bytes() {
        assert!(is_malformed(decode(&[0x0c, 0x01, 0x41])));
        assert!(is_malformed(decode(&[0x05, 0x00, 0x05, 0x00])));
    }

    #[test]
    fn rejects_partial_bit_strings() {
        assert!(is_malformed(decode(&[0x03, 0x00])));
        assert!(is_malformed(decode(&[0x03, 0x02, 0x04, 0xf0])));
    }

    #[test]
    fn rejects_deep_nesting() {
        let mut bytes = vec![0x05, 0x00];
        for _ in 0..(MAX_DEPTH + 1) {
            let mut outer = vec![0x30, bytes.len() as u8];
            outer.extend_from_slice(&bytes);
            bytes = outer;
        }
        assert!(is_malformed(decode(&bytes)));
    }

    #[test]
    fn parse_sequence_requires_sequence() {
        let err = parse_sequence(&[0x02, 0x01, 0x00]).unwrap_err();
        assert!(err.to_string().contains("expected SEQUENCE, found INTEGER"));
    }
}
