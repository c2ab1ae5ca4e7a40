// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for PKCS8 and X.509 encode/decode in the
// keysync-codec crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use keysync_codec::{export_private_key, export_public_key, parse_private_key, parse_public_key};
use keysync_core::types::{Algorithm, DsaPrivateKey, KeyParams, RsaPublicKey};
use num_bigint::BigUint;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// DSA-1024 sized parameters (values are not a real key; sizes are).
fn dsa_1024() -> KeyParams {
    KeyParams::DsaPrivate(DsaPrivateKey {
        p: BigUint::from_bytes_be(&[0xd1; 128]),
        q: BigUint::from_bytes_be(&[0xe3; 20]),
        g: BigUint::from_bytes_be(&[0x47; 128]),
        x: BigUint::from_bytes_be(&[0x2b; 20]),
    })
}

fn rsa_2048_public() -> KeyParams {
    KeyParams::RsaPublic(RsaPublicKey {
        n: BigUint::from_bytes_be(&[0xc5; 256]),
        e: BigUint::from(65537u32),
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Export then parse a DSA-1024 PKCS8 container.
fn bench_pkcs8_dsa_roundtrip(c: &mut Criterion) {
    let params = dsa_1024();

    c.bench_function("pkcs8_dsa_roundtrip (1024-bit)", |b| {
        b.iter(|| {
            let der = export_private_key(Algorithm::Dsa, black_box(&params)).expect("export failed");
            let parsed = parse_private_key(&der).expect("parse failed");
            black_box(parsed);
        });
    });
}

/// Parse only, on a pre-built 2048-bit RSA SubjectPublicKeyInfo.
fn bench_x509_rsa_parse(c: &mut Criterion) {
    let der = export_public_key(Algorithm::Rsa, &rsa_2048_public()).expect("export failed");

    c.bench_function("x509_rsa_parse (2048-bit)", |b| {
        b.iter(|| {
            let parsed = parse_public_key(black_box(&der)).expect("parse failed");
            black_box(parsed);
        });
    });
}

criterion_group!(benches, bench_pkcs8_dsa_roundtrip, bench_x509_rsa_parse);
criterion_main!(benches);
