// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reconciliation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that steer how sources are folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Source names in merge order. Earlier sources win field conflicts;
    /// unlisted sources are merged after these, in the order they were added.
    pub source_precedence: Vec<String>,
    /// Fill in missing fingerprints from DSA key material after merging and
    /// flag stored fingerprints that disagree with the key.
    pub derive_fingerprints: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_precedence: Vec::new(),
            derive_fingerprints: true,
        }
    }
}

impl SyncConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Position of `source` in the precedence list, if listed.
    pub fn precedence_of(&self, source: &str) -> Option<usize> {
        self.source_precedence.iter().position(|s| s == source)
    }
}
