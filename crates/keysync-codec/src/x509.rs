// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// X.509 public key info (not a full certificate).
//
//   SubjectPublicKeyInfo ::= SEQUENCE {
//     algorithm         AlgorithmIdentifier,
//     subjectPublicKey  BIT STRING }
//
// The BIT STRING payload is itself DER: SEQUENCE { n, e } for RSA, a bare
// INTEGER y for DSA (p, q, g come from the AlgorithmIdentifier).

use der::asn1::BitString;
use der::{Decode, Encode};
use keysync_core::error::{KeysyncError, Result};
use keysync_core::types::{Algorithm, DsaPublicKey, KeyParams, RsaPublicKey};
use spki::{SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef};
use tracing::{debug, instrument};

use crate::algorithm;
use crate::armor;
use crate::asn1::{self, DerValue, biguint, der_error, uint_ref};

/// Parse a DER `SubjectPublicKeyInfo`.
#[instrument(skip_all, fields(len = bytes.len()))]
pub fn parse_public_key(bytes: &[u8]) -> Result<(Algorithm, KeyParams)> {
    let info = SubjectPublicKeyInfoRef::from_der(bytes).map_err(der_error)?;
    let (alg, alg_params) = algorithm::decode_identifier(info.algorithm)?;
    let key_bytes = info.subject_public_key.as_bytes().ok_or_else(|| {
        KeysyncError::malformed("subjectPublicKey BIT STRING has unused bits")
    })?;

    let params = match alg {
        Algorithm::Rsa => {
            algorithm::check_rsa_params(alg_params)?;
            let key = pkcs1::RsaPublicKey::from_der(key_bytes).map_err(der_error)?;
            KeyParams::RsaPublic(RsaPublicKey {
                n: biguint(key.modulus),
                e: biguint(key.public_exponent),
            })
        }
        Algorithm::Dsa => {
            let domain = algorithm::decode_dsa_domain(alg_params)?;
            KeyParams::DsaPublic(DsaPublicKey {
                p: domain.p,
                q: domain.q,
                g: domain.g,
                y: asn1::decode(key_bytes)?.into_integer()?,
            })
        }
    };

    debug!(algorithm = %alg, "X.509 public key parsed");
    Ok((alg, params))
}

/// Build a DER `SubjectPublicKeyInfo`.
///
/// `params` must be the public parameter set for `algorithm`.
#[instrument(skip(params), fields(%algorithm))]
pub fn export_public_key(algorithm: Algorithm, params: &KeyParams) -> Result<Vec<u8>> {
    let (identifier, key_bytes) = match (algorithm, params) {
        (Algorithm::Rsa, KeyParams::RsaPublic(k)) => {
            let (n, e) = (k.n.to_bytes_be(), k.e.to_bytes_be());
            let key = pkcs1::RsaPublicKey {
                modulus: uint_ref(&n)?,
                public_exponent: uint_ref(&e)?,
            };
            (algorithm::rsa_identifier(), key.to_der().map_err(der_error)?)
        }
        (Algorithm::Dsa, KeyParams::DsaPublic(k)) => (
            algorithm::dsa_identifier(&k.p, &k.q, &k.g)?,
            asn1::encode(&DerValue::from(&k.y))?,
        ),
        _ => {
            return Err(KeysyncError::InvalidParameters(format!(
                "{algorithm} X.509 export needs {algorithm} public parameters, got {:?}",
                params.shape()
            )));
        }
    };

    let info = SubjectPublicKeyInfoOwned {
        algorithm: identifier,
        subject_public_key: BitString::from_bytes(&key_bytes).map_err(der_error)?,
    };
    let bytes = info.to_der().map_err(der_error)?;
    debug!(len = bytes.len(), "X.509 public key exported");
    Ok(bytes)
}

/// Parse a base64-armoured `SubjectPublicKeyInfo`.
pub fn parse_public_key_base64(text: &str) -> Result<(Algorithm, KeyParams)> {
    parse_public_key(&armor::decode(text)?)
}

/// Export as base64 text with no line breaks.
pub fn export_public_key_base64(algorithm: Algorithm, params: &KeyParams) -> Result<String> {
    Ok(armor::encode(&export_public_key(algorithm, params)?))
}
