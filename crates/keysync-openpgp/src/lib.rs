// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// keysync-openpgp: reads GnuPG secret keyrings through `pgp` and pulls out
// DSA secret subkeys as OTR key candidates.

pub mod secring;

pub use secring::{KeyId, extract_dsa_secret_subkeys};
