// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for KeySync.
//
// Field conflicts found while merging records are NOT errors; they are
// reported as `FieldConflict` values alongside the merged data.

use thiserror::Error;

/// Top-level error type for all KeySync operations.
#[derive(Debug, Error)]
pub enum KeysyncError {
    // -- Codec errors --
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("unsupported algorithm: {0} (expected RSA or DSA)")]
    UnsupportedAlgorithm(String),

    #[error("invalid key parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    // -- Records --
    #[error("inconsistent key record: {0}")]
    InvalidRecord(String),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KeysyncError {
    /// Shorthand used by the decoders.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedEncoding(detail.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KeysyncError>;
