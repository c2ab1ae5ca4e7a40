// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PKCS8 private key containers.
//
//   PrivateKeyInfo ::= SEQUENCE {
//     version              INTEGER (0),
//     privateKeyAlgorithm  AlgorithmIdentifier,
//     privateKey           OCTET STRING }
//
// RSA: privateKey holds SEQUENCE { 0, n, e, d, p, q, dp, dq, invq }.
// DSA: p, q, g live in the AlgorithmIdentifier; privateKey holds INTEGER x.

use der::{Decode, Encode};
use keysync_core::error::{KeysyncError, Result};
use keysync_core::types::{Algorithm, DsaPrivateKey, KeyParams, RsaPrivateKey};
use ::pkcs8::PrivateKeyInfo;
use tracing::{debug, instrument};

use crate::algorithm;
use crate::armor;
use crate::asn1::{self, DerValue, biguint, der_error, uint_ref};

/// Parse a DER `PrivateKeyInfo`.
///
/// Only version 0 containers (no embedded public key) are accepted.
#[instrument(skip_all, fields(len = bytes.len()))]
pub fn parse_private_key(bytes: &[u8]) -> Result<(Algorithm, KeyParams)> {
    let info = PrivateKeyInfo::from_der(bytes).map_err(der_error)?;
    if info.public_key.is_some() {
        return Err(KeysyncError::malformed("unrecognized PKCS8 version 1"));
    }

    let (alg, alg_params) = algorithm::decode_identifier(info.algorithm)?;

    let params = match alg {
        Algorithm::Rsa => {
            algorithm::check_rsa_params(alg_params)?;
            let key = pkcs1::RsaPrivateKey::from_der(info.private_key).map_err(der_error)?;
            if key.other_prime_infos.is_some() {
                return Err(KeysyncError::malformed(
                    "unrecognized RSA private key version 1 (multi-prime)",
                ));
            }
            KeyParams::RsaPrivate(RsaPrivateKey {
                n: biguint(key.modulus),
                e: biguint(key.public_exponent),
                d: biguint(key.private_exponent),
                p: biguint(key.prime1),
                q: biguint(key.prime2),
                dp: biguint(key.exponent1),
                dq: biguint(key.exponent2),
                invq: biguint(key.coefficient),
            })
        }
        Algorithm::Dsa => {
            let domain = algorithm::decode_dsa_domain(alg_params)?;
            let x = asn1::decode(info.private_key)?.into_integer()?;
            KeyParams::DsaPrivate(DsaPrivateKey {
                p: domain.p,
                q: domain.q,
                g: domain.g,
                x,
            })
        }
    };

    debug!(algorithm = %alg, "PKCS8 private key parsed");
    Ok((alg, params))
}

/// Build a DER `PrivateKeyInfo` (version 0).
///
/// `params` must be the private parameter set for `algorithm`; anything else
/// fails with `InvalidParameters`.
#[instrument(skip(params), fields(%algorithm))]
pub fn export_private_key(algorithm: Algorithm, params: &KeyParams) -> Result<Vec<u8>> {
    let (identifier, key_bytes) = match (algorithm, params) {
        (Algorithm::Rsa, KeyParams::RsaPrivate(k)) => {
            let [n, e, d, p, q, dp, dq, invq] =
                [&k.n, &k.e, &k.d, &k.p, &k.q, &k.dp, &k.dq, &k.invq].map(|v| v.to_bytes_be());
            let key = pkcs1::RsaPrivateKey {
                modulus: uint_ref(&n)?,
                public_exponent: uint_ref(&e)?,
                private_exponent: uint_ref(&d)?,
                prime1: uint_ref(&p)?,
                prime2: uint_ref(&q)?,
                exponent1: uint_ref(&dp)?,
                exponent2: uint_ref(&dq)?,
                coefficient: uint_ref(&invq)?,
                other_prime_infos: None,
            };
            (algorithm::rsa_identifier(), key.to_der().map_err(der_error)?)
        }
        (Algorithm::Dsa, KeyParams::DsaPrivate(k)) => (
            algorithm::dsa_identifier(&k.p, &k.q, &k.g)?,
            asn1::encode(&DerValue::from(&k.x))?,
        ),
        _ => {
            return Err(KeysyncError::InvalidParameters(format!(
                "{algorithm} PKCS8 export needs {algorithm} private parameters, got {:?}",
                params.shape()
            )));
        }
    };

    let info = PrivateKeyInfo::new(algorithm::borrowed(&identifier), &key_bytes);
    let bytes = info.to_der().map_err(der_error)?;
    debug!(len = bytes.len(), "PKCS8 private key exported");
    Ok(bytes)
}

/// Parse a base64-armoured `PrivateKeyInfo`, as stored by OTR clients.
pub fn parse_private_key_base64(text: &str) -> Result<(Algorithm, KeyParams)> {
    parse_private_key(&armor::decode(text)?)
}

/// Export as base64 text with no line breaks.
pub fn export_private_key_base64(algorithm: Algorithm, params: &KeyParams) -> Result<String> {
    Ok(armor::encode(&export_private_key(algorithm, params)?))
}
