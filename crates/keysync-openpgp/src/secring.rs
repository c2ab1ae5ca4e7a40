// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DSA secret-subkey extraction from a binary secret keyring (secring.gpg).
//
// There is no agreed user-ID marker for "this subkey is my OTR key", so every
// v4 DSA secret subkey is returned as a candidate and the caller decides which
// one to use.  Packet framing, MPI decoding and the plaintext checksum are
// left to `pgp`; this module only filters and projects.

use std::collections::BTreeMap;
use std::fmt;

use keysync_core::error::{KeysyncError, Result};
use keysync_core::types::DsaKeyPair;
use num_bigint::BigUint;
use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::packet::{Packet, PacketParser, SecretSubkey};
use pgp::types::{Mpi, PlainSecretParams, PublicKeyTrait, PublicParams, SecretParams};
use tracing::{debug, instrument, warn};

/// 64-bit OpenPGP key ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub [u8; 8]);

impl TryFrom<pgp::types::KeyId> for KeyId {
    type Error = KeysyncError;

    fn try_from(id: pgp::types::KeyId) -> Result<Self> {
        let raw: [u8; 8] = id.as_ref().try_into().map_err(|_| {
            KeysyncError::malformed(format!("key ID is {} bytes, expected 8", id.as_ref().len()))
        })?;
        Ok(Self(raw))
    }
}

/// Upper-case hex, as GnuPG prints long key IDs.
impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// Extract every DSA secret subkey from a binary keyring, keyed by key ID.
///
/// Packets of any other kind and subkeys of other algorithms are skipped.
/// A passphrase-protected subkey is still a candidate: its public half and
/// key ID are returned with `x` set to `None`.  A packet stream that `pgp`
/// cannot parse is `MalformedEncoding`.
#[instrument(skip_all, fields(len = keyring.len()))]
pub fn extract_dsa_secret_subkeys(keyring: &[u8]) -> Result<BTreeMap<KeyId, DsaKeyPair>> {
    let mut keys = BTreeMap::new();
    let mut seen = 0usize;

    for packet in PacketParser::new(keyring) {
        let packet = packet.map_err(|error| {
            KeysyncError::malformed(format!("unreadable keyring packet: {error}"))
        })?;
        seen += 1;
        let Packet::SecretSubkey(subkey) = packet else {
            continue;
        };
        if let Some((key_id, pair)) = dsa_candidate(&subkey)? {
            debug!(%key_id, protected = pair.is_protected(), "DSA secret subkey found");
            keys.insert(key_id, pair);
        }
    }

    debug!(packets = seen, dsa_subkeys = keys.len(), "keyring scanned");
    Ok(keys)
}

fn dsa_candidate(subkey: &SecretSubkey) -> Result<Option<(KeyId, DsaKeyPair)>> {
    if subkey.algorithm() != PublicKeyAlgorithm::DSA {
        return Ok(None);
    }
    let PublicParams::DSA { p, q, g, y } = subkey.public_params() else {
        return Err(KeysyncError::malformed(
            "DSA subkey carries non-DSA public parameters",
        ));
    };
    let key_id = KeyId::try_from(subkey.key_id())?;

    let x = match subkey.secret_params() {
        SecretParams::Plain(PlainSecretParams::DSA(x)) => Some(integer(x)),
        SecretParams::Plain(_) => {
            return Err(KeysyncError::malformed(format!(
                "secret subkey {key_id} has non-DSA secret parameters"
            )));
        }
        SecretParams::Encrypted(_) => {
            warn!(%key_id, "DSA secret subkey is passphrase-protected; x unavailable");
            None
        }
    };

    Ok(Some((
        key_id,
        DsaKeyPair {
            p: integer(p),
            q: integer(q),
            g: integer(g),
            y: integer(y),
            x,
        },
    )))
}

fn integer(mpi: &Mpi) -> BigUint {
    BigUint::from_bytes_be(mpi.as_bytes())
}
