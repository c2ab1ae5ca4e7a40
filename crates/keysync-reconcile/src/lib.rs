// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// KeySync reconciliation: fingerprints, record merging, and folding of
// per-application sources into one canonical record set.

pub mod fingerprint;
pub mod merge;
pub mod reconciler;

pub use fingerprint::{fingerprint, key_fingerprint};
pub use merge::{Merged, merge_collection, merge_collections, merge_field, merge_record};
pub use reconciler::{Reconciler, Reconciliation, SourceConflict, SourceFailure};
