// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// keysync-codec: key container codecs.
//
// A strict DER value tree narrowed to the key container grammar, PKCS8
// `PrivateKeyInfo` and X.509 `SubjectPublicKeyInfo` for RSA and DSA, the DER
// form of DSA signatures, and the base64 armour client applications store
// these blobs in.  Framing and canonical-form checks are the RustCrypto
// `der`/`spki`/`pkcs8`/`pkcs1` crates.

pub mod armor;
pub mod asn1;
pub mod pkcs8;
pub mod signature;
pub mod x509;

mod algorithm;

pub use asn1::DerValue;
pub use self::pkcs8::{export_private_key, parse_private_key};
pub use signature::{decode_dsa_signature, encode_dsa_signature};
pub use x509::{export_public_key, parse_public_key};
