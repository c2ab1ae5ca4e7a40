// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// First-write-wins record merging.
//
// The destination always keeps the first value it saw for a field. A later,
// different value is discarded and reported as a `FieldConflict`; it never
// aborts the merge. Which source wins a disagreement is therefore decided
// entirely by the order in which the caller merges sources.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::Display;

use keysync_core::types::{FieldConflict, KeyRecord, KeyRecordCollection};
use tracing::debug;

/// A merge result together with every conflict found while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merged<T> {
    pub value: T,
    pub conflicts: Vec<FieldConflict>,
}

impl<T> Merged<T> {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Set `key` in `destination` unless it already holds a different value.
pub fn merge_field(
    destination: &mut BTreeMap<String, String>,
    identity: &str,
    key: &str,
    value: &str,
) -> Option<FieldConflict> {
    match destination.entry(key.to_owned()) {
        Entry::Vacant(slot) => {
            slot.insert(value.to_owned());
            None
        }
        Entry::Occupied(existing) if existing.get() == value => None,
        Entry::Occupied(existing) => Some(conflict(identity, key, existing.get(), value)),
    }
}

/// Optional-field counterpart of [`merge_field`].
fn merge_slot<T: Clone + PartialEq + Display>(
    slot: &mut Option<T>,
    incoming: &Option<T>,
    identity: &str,
    field: &str,
) -> Option<FieldConflict> {
    let incoming = incoming.as_ref()?;
    match slot {
        None => {
            *slot = Some(incoming.clone());
            None
        }
        Some(existing) if *existing == *incoming => None,
        Some(existing) => Some(conflict(identity, field, existing, incoming)),
    }
}

/// Merge every field `source` carries into `destination`, in place.
pub fn merge_record(destination: &mut KeyRecord, source: &KeyRecord) -> Vec<FieldConflict> {
    let identity = if destination.name.is_empty() {
        source.identity().to_owned()
    } else {
        destination.identity().to_owned()
    };
    let mut conflicts = Vec::new();

    if !source.name.is_empty() {
        if destination.name.is_empty() {
            destination.name = source.name.clone();
        } else if destination.name != source.name {
            conflicts.push(conflict(&identity, "name", &destination.name, &source.name));
        }
    }

    conflicts.extend(
        [
            merge_slot(&mut destination.protocol, &source.protocol, &identity, "protocol"),
            merge_slot(&mut destination.account, &source.account, &identity, "account"),
            merge_slot(
                &mut destination.fingerprint,
                &source.fingerprint,
                &identity,
                "fingerprint",
            ),
            merge_slot(
                &mut destination.private_key,
                &source.private_key,
                &identity,
                "private_key",
            ),
            merge_slot(
                &mut destination.public_key,
                &source.public_key,
                &identity,
                "public_key",
            ),
        ]
        .into_iter()
        .flatten(),
    );

    for (key, value) in &source.attributes {
        conflicts.extend(merge_field(&mut destination.attributes, &identity, key, value));
    }

    if !conflicts.is_empty() {
        debug!(identity = %identity, conflicts = conflicts.len(), "record merged with conflicts");
    }
    conflicts
}

/// Fold `source` into `destination`.
///
/// Records whose name is new to `destination` are inserted as they are;
/// the rest go through [`merge_record`].
pub fn merge_collection(
    destination: &mut KeyRecordCollection,
    source: KeyRecordCollection,
) -> Vec<FieldConflict> {
    let mut conflicts = Vec::new();
    for (name, record) in source {
        match destination.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut existing) => {
                conflicts.extend(merge_record(existing.get_mut(), &record));
            }
        }
    }
    conflicts
}

/// Fold collections left to right; earlier collections win conflicts.
pub fn merge_collections(
    sources: impl IntoIterator<Item = KeyRecordCollection>,
) -> Merged<KeyRecordCollection> {
    let mut merged = Merged::default();
    for source in sources {
        let conflicts = merge_collection(&mut merged.value, source);
        merged.conflicts.extend(conflicts);
    }
    merged
}

fn conflict(
    identity: &str,
    field: &str,
    kept: impl Display,
    discarded: impl Display,
) -> FieldConflict {
    FieldConflict {
        identity: identity.to_owned(),
        field: field.to_owned(),
        kept: kept.to_string(),
        discarded: discarded.to_string(),
    }
}
