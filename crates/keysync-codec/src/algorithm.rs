// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AlgorithmIdentifier ::= SEQUENCE { algorithm OID, parameters ANY OPTIONAL }
//
// Shared by PKCS8 and X.509.  RSA carries NULL (or nothing); DSA carries the
// domain parameters SEQUENCE { p, q, g }.

use der::Decode;
use der::asn1::{Any, Null};
use der::referenced::OwnedToRef;
use keysync_core::error::{KeysyncError, Result};
use keysync_core::types::Algorithm;
use num_bigint::BigUint;
use spki::{AlgorithmIdentifierOwned, AlgorithmIdentifierRef};

use crate::asn1::{self, DerValue, der_error};

/// DSA domain parameters.
pub(crate) struct DsaDomain {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

pub(crate) fn rsa_identifier() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: Algorithm::RSA_OID,
        parameters: Some(Null.into()),
    }
}

pub(crate) fn dsa_identifier(
    p: &BigUint,
    q: &BigUint,
    g: &BigUint,
) -> Result<AlgorithmIdentifierOwned> {
    let domain =
        asn1::build_sequence(&[DerValue::from(p), DerValue::from(q), DerValue::from(g)])?;
    Ok(AlgorithmIdentifierOwned {
        oid: Algorithm::DSA_OID,
        parameters: Some(Any::from_der(&domain).map_err(der_error)?),
    })
}

/// Borrowed view for containers that only take `AlgorithmIdentifierRef`.
pub(crate) fn borrowed(identifier: &AlgorithmIdentifierOwned) -> AlgorithmIdentifierRef<'_> {
    AlgorithmIdentifierRef {
        oid: identifier.oid,
        parameters: identifier.parameters.as_ref().map(|any| any.owned_to_ref()),
    }
}

/// Split an AlgorithmIdentifier into the algorithm and its raw parameters.
pub(crate) fn decode_identifier(
    identifier: AlgorithmIdentifierRef<'_>,
) -> Result<(Algorithm, Option<DerValue>)> {
    let algorithm = Algorithm::from_oid(&identifier.oid)?;
    let params = identifier
        .parameters
        .map(|any| asn1::from_any(any, 0))
        .transpose()?;
    Ok((algorithm, params))
}

/// RSA parameters must be NULL or absent.
pub(crate) fn check_rsa_params(params: Option<DerValue>) -> Result<()> {
    match params {
        None | Some(DerValue::Null) => Ok(()),
        Some(other) => Err(KeysyncError::malformed(format!(
            "RSA AlgorithmIdentifier parameters must be NULL, found {}",
            other.kind_name()
        ))),
    }
}

pub(crate) fn decode_dsa_domain(params: Option<DerValue>) -> Result<DsaDomain> {
    let params =
        params.ok_or_else(|| KeysyncError::malformed("DSA AlgorithmIdentifier has no parameters"))?;
    let [p, q, g] = exact_fields::<3>(params.into_sequence()?, "DSA parameters")?;
    Ok(DsaDomain {
        p: p.into_integer()?,
        q: q.into_integer()?,
        g: g.into_integer()?,
    })
}

/// Require exactly `N` fields; any other arity is a structural error.
pub(crate) fn exact_fields<const N: usize>(
    fields: Vec<DerValue>,
    what: &str,
) -> Result<[DerValue; N]> {
    <[DerValue; N]>::try_from(fields).map_err(|fields| {
        KeysyncError::malformed(format!(
            "{what} must have {N} fields, found {}",
            fields.len()
        ))
    })
}
