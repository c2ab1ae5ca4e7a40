// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for fingerprinting and collection merging in the
// keysync-reconcile crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use keysync_core::types::{DsaPublicKey, KeyParams, KeyRecord, KeyRecordCollection};
use keysync_reconcile::{fingerprint, merge_collections};
use num_bigint::BigUint;

/// `count` buddies, each with a DSA-1024 sized public key.
fn buddy_list(count: usize, protocol: &str) -> KeyRecordCollection {
    (0..count)
        .map(|i| {
            KeyRecord::new(format!("buddy{i}@example.org"))
                .with_protocol(protocol)
                .with_public_key(KeyParams::DsaPublic(DsaPublicKey {
                    p: BigUint::from_bytes_be(&[0xd1; 128]),
                    q: BigUint::from_bytes_be(&[0xe3; 20]),
                    g: BigUint::from_bytes_be(&[0x47; 128]),
                    y: BigUint::from(i) + BigUint::from_bytes_be(&[0x6c; 128]),
                }))
                .with_attribute("verified", "smp")
        })
        .collect()
}

fn bench_fingerprint(c: &mut Criterion) {
    let p = BigUint::from_bytes_be(&[0xd1; 128]);
    let q = BigUint::from_bytes_be(&[0xe3; 20]);
    let g = BigUint::from_bytes_be(&[0x47; 128]);
    let y = BigUint::from_bytes_be(&[0x6c; 128]);

    c.bench_function("fingerprint (DSA-1024)", |b| {
        b.iter(|| black_box(fingerprint(&p, &q, &g, black_box(&y))));
    });
}

/// Two applications that agree on every field except protocol.
fn bench_merge_500(c: &mut Criterion) {
    let first = buddy_list(500, "prpl-jabber");
    let second = buddy_list(500, "xmpp");

    c.bench_function("merge_collections (2 x 500 records)", |b| {
        b.iter(|| {
            let merged = merge_collections([first.clone(), second.clone()]);
            black_box(merged);
        });
    });
}

criterion_group!(benches, bench_fingerprint, bench_merge_500);
criterion_main!(benches);
