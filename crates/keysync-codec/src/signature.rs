// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DSA signatures in their DER form: SEQUENCE { r INTEGER, s INTEGER }.

use keysync_core::error::Result;
use num_bigint::BigUint;

use crate::algorithm::exact_fields;
use crate::asn1::{self, DerValue};

/// DER-encode a DSA signature `(r, s)`.
pub fn encode_dsa_signature(r: &BigUint, s: &BigUint) -> Result<Vec<u8>> {
    asn1::build_sequence(&[DerValue::from(r), DerValue::from(s)])
}

/// Returns `(r, s)`. Any arity other than two is `MalformedEncoding`.
pub fn decode_dsa_signature(bytes: &[u8]) -> Result<(BigUint, BigUint)> {
    let [r, s] = exact_fields::<2>(asn1::parse_sequence(bytes)?, "DSA signature")?;
    Ok((r.into_integer()?, s.into_integer()?))
}
