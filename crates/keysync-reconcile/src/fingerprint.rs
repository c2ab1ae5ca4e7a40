// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OTR DSA fingerprints.
//
// SHA-1 over p, q, g, y, each written as a four-byte big-endian length
// followed by its minimal big-endian magnitude. This is the OTR MPI layout
// without the key-type prefix, and matches what libotr shows users.

use keysync_core::types::{DsaPublicKey, Fingerprint, KeyParams};
use num_bigint::BigUint;
use sha1::{Digest, Sha1};

/// Fingerprint of the DSA public key `(p, q, g, y)`.
pub fn fingerprint(p: &BigUint, q: &BigUint, g: &BigUint, y: &BigUint) -> Fingerprint {
    let mut hasher = Sha1::new();
    for value in [p, q, g, y] {
        // Zero encodes as a single 0x00 byte.
        let bytes = value.to_bytes_be();
        hasher.update((bytes.len() as u32).to_be_bytes());
        hasher.update(&bytes);
    }
    let mut digest = [0u8; 20];
    digest.copy_from_slice(&hasher.finalize());
    Fingerprint::from_digest(&digest)
}

pub fn dsa_public_fingerprint(key: &DsaPublicKey) -> Fingerprint {
    fingerprint(&key.p, &key.q, &key.g, &key.y)
}

/// Fingerprint for any DSA parameter set.
///
/// Private keys go through their derived public value. RSA keys have no OTR
/// fingerprint and yield `None`, as does a DSA key with a zero modulus.
pub fn key_fingerprint(params: &KeyParams) -> Option<Fingerprint> {
    match params.public_params()? {
        KeyParams::DsaPublic(key) => Some(dsa_public_fingerprint(&key)),
        _ => None,
    }
}
