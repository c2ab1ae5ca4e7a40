// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folds the record sets read from several client applications into one.
//
// Each source arrives as the outcome of its reader: a record collection or
// the error that stopped it. Failed sources are recorded and skipped so one
// broken key store never blocks the rest. Sources merge in the configured
// precedence, so the first listed source wins every disagreement.

use keysync_core::config::SyncConfig;
use keysync_core::error::{KeysyncError, Result};
use keysync_core::human_errors::{HumanError, describe_conflict, humanize_error};
use keysync_core::types::{FieldConflict, KeyRecordCollection};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::fingerprint::key_fingerprint;
use crate::merge::merge_collection;

/// Source label attached to conflicts found by fingerprint derivation.
pub const DERIVED_SOURCE: &str = "derived";

/// A conflict and the source whose value was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceConflict {
    pub source: String,
    pub conflict: FieldConflict,
}

/// A source that could not be read at all.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: KeysyncError,
}

/// Outcome of a reconciliation run.
#[derive(Debug, Default)]
pub struct Reconciliation {
    pub records: KeyRecordCollection,
    pub conflicts: Vec<SourceConflict>,
    pub failures: Vec<SourceFailure>,
}

impl Reconciliation {
    /// No conflicts and no failed sources.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.failures.is_empty()
    }

    /// User-facing messages: failures first, then conflicts.
    pub fn messages(&self) -> Vec<HumanError> {
        self.failures
            .iter()
            .map(|f| humanize_error(&f.error))
            .chain(self.conflicts.iter().map(|c| describe_conflict(&c.conflict)))
            .collect()
    }
}

struct Source {
    name: String,
    records: Result<KeyRecordCollection>,
}

/// Collects sources, then merges them in one pass.
pub struct Reconciler {
    config: SyncConfig,
    sources: Vec<Source>,
}

impl Reconciler {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
        }
    }

    /// Register the outcome of reading one application's key store.
    pub fn add_source(&mut self, name: impl Into<String>, records: Result<KeyRecordCollection>) {
        self.sources.push(Source {
            name: name.into(),
            records,
        });
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Merge every source and, if configured, fill in fingerprints.
    #[instrument(skip_all, fields(sources = self.sources.len()))]
    pub fn finish(self) -> Reconciliation {
        let Self {
            config,
            mut sources,
        } = self;

        // Stable: unlisted sources keep the order they were added in.
        sources.sort_by_key(|s| config.precedence_of(&s.name).unwrap_or(usize::MAX));

        let mut outcome = Reconciliation::default();
        for source in sources {
            match source.records {
                Ok(records) => {
                    debug!(source = %source.name, records = records.len(), "merging source");
                    for conflict in merge_collection(&mut outcome.records, records) {
                        warn!(source = %source.name, %conflict, "conflicting value discarded");
                        outcome.conflicts.push(SourceConflict {
                            source: source.name.clone(),
                            conflict,
                        });
                    }
                }
                Err(error) => {
                    warn!(source = %source.name, %error, "source skipped");
                    outcome.failures.push(SourceFailure {
                        source: source.name,
                        error,
                    });
                }
            }
        }

        if config.derive_fingerprints {
            derive_fingerprints(&mut outcome);
        }

        debug!(
            records = outcome.records.len(),
            conflicts = outcome.conflicts.len(),
            failures = outcome.failures.len(),
            "reconciliation finished"
        );
        outcome
    }
}

/// Fill missing fingerprints from DSA key material; flag stored ones that
/// do not match the key. A stored fingerprint is never replaced.
fn derive_fingerprints(outcome: &mut Reconciliation) {
    for record in outcome.records.values_mut() {
        let derived = record
            .public_key
            .as_ref()
            .and_then(key_fingerprint)
            .or_else(|| record.private_key.as_ref().and_then(key_fingerprint));
        let Some(derived) = derived else {
            continue;
        };

        match &record.fingerprint {
            None => {
                debug!(
                    identity = %record.identity(),
                    fingerprint = %derived,
                    "fingerprint derived"
                );
                record.fingerprint = Some(derived);
            }
            Some(stored) if *stored == derived => {}
            Some(stored) => {
                let conflict = FieldConflict {
                    identity: record.identity().to_owned(),
                    field: "fingerprint".to_owned(),
                    kept: stored.to_string(),
                    discarded: derived.to_string(),
                };
                warn!(%conflict, "stored fingerprint does not match key");
                outcome.conflicts.push(SourceConflict {
                    source: DERIVED_SOURCE.to_owned(),
                    conflict,
                });
            }
        }
    }
}
