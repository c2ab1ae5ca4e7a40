// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for KeySync: algorithms, key parameter sets, identity
// records and the conflict value produced when records disagree.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use const_oid::ObjectIdentifier;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{KeysyncError, Result};

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Public-key algorithms the key containers may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Rsa,
    Dsa,
}

impl Algorithm {
    /// rsaEncryption (PKCS #1).
    pub const RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
    /// id-dsa (RFC 3279).
    pub const DSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::Rsa => Self::RSA_OID,
            Self::Dsa => Self::DSA_OID,
        }
    }

    /// Map an object identifier back to an algorithm.
    ///
    /// Anything other than the two known OIDs is rejected; there is no
    /// fallback.
    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        if *oid == Self::RSA_OID {
            Ok(Self::Rsa)
        } else if *oid == Self::DSA_OID {
            Ok(Self::Dsa)
        } else {
            Err(KeysyncError::UnsupportedAlgorithm(oid.to_string()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Dsa => "DSA",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Key parameter sets
// ---------------------------------------------------------------------------

/// RSA private key (PKCS #1 `RSAPrivateKey` without the version field).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateKey {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub dp: BigUint,
    pub dq: BigUint,
    pub invq: BigUint,
}

impl RsaPrivateKey {
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &abbreviate(&self.n))
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// DSA private key: domain parameters plus the secret exponent `x`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsaPrivateKey {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
    pub x: BigUint,
}

impl DsaPrivateKey {
    /// Derive the matching public key (`y = g^x mod p`).
    ///
    /// Returns `None` when `p` is zero, which no real key has.
    pub fn public_key(&self) -> Option<DsaPublicKey> {
        if self.p.bits() == 0 {
            return None;
        }
        Some(DsaPublicKey {
            p: self.p.clone(),
            q: self.q.clone(),
            g: self.g.clone(),
            y: self.g.modpow(&self.x, &self.p),
        })
    }
}

impl fmt::Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaPrivateKey")
            .field("p_bits", &self.p.bits())
            .field("q_bits", &self.q.bits())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsaPublicKey {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
    pub y: BigUint,
}

/// A DSA key as stored in an OpenPGP secret subkey packet.
///
/// Carries `y` and, when the packet is not passphrase-protected, `x`, so it
/// is not itself one of the four [`KeyShape`]s; use the projections to
/// obtain one.
#[derive(Clone, PartialEq, Eq)]
pub struct DsaKeyPair {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
    pub y: BigUint,
    /// `None` when the secret half is encrypted in the keyring.
    pub x: Option<BigUint>,
}

impl DsaKeyPair {
    pub fn is_protected(&self) -> bool {
        self.x.is_none()
    }

    /// The private parameter set, if `x` was readable.
    pub fn private_params(&self) -> Option<KeyParams> {
        let x = self.x.as_ref()?;
        Some(KeyParams::DsaPrivate(DsaPrivateKey {
            p: self.p.clone(),
            q: self.q.clone(),
            g: self.g.clone(),
            x: x.clone(),
        }))
    }

    pub fn public_params(&self) -> KeyParams {
        KeyParams::DsaPublic(DsaPublicKey {
            p: self.p.clone(),
            q: self.q.clone(),
            g: self.g.clone(),
            y: self.y.clone(),
        })
    }
}

impl fmt::Debug for DsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaKeyPair")
            .field("p_bits", &self.p.bits())
            .field("y", &abbreviate(&self.y))
            .field("protected", &self.is_protected())
            .finish_non_exhaustive()
    }
}

/// The four valid parameter-set shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyShape {
    RsaPrivate,
    RsaPublic,
    DsaPrivate,
    DsaPublic,
}

impl KeyShape {
    pub const ALL: [KeyShape; 4] = [
        KeyShape::RsaPrivate,
        KeyShape::RsaPublic,
        KeyShape::DsaPrivate,
        KeyShape::DsaPublic,
    ];

    /// Parameter names making up this shape, in container order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::RsaPrivate => &["n", "e", "d", "p", "q", "dp", "dq", "invq"],
            Self::RsaPublic => &["n", "e"],
            Self::DsaPrivate => &["p", "q", "g", "x"],
            Self::DsaPublic => &["p", "q", "g", "y"],
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::RsaPrivate | Self::RsaPublic => Algorithm::Rsa,
            Self::DsaPrivate | Self::DsaPublic => Algorithm::Dsa,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::RsaPrivate | Self::DsaPrivate)
    }

    /// Find the shape whose field set is exactly `names`.
    pub fn detect<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut names: Vec<&str> = names.into_iter().collect();
        names.sort_unstable();
        Self::ALL.into_iter().find(|shape| {
            let mut expected = shape.field_names().to_vec();
            expected.sort_unstable();
            expected == names
        })
    }
}

/// An algorithm-tagged key parameter set.
///
/// Each variant fixes its field set at compile time; the untyped
/// name-to-integer form used by application readers and writers is available
/// through [`KeyParams::from_named`] and [`KeyParams::to_named`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyParams {
    RsaPrivate(RsaPrivateKey),
    RsaPublic(RsaPublicKey),
    DsaPrivate(DsaPrivateKey),
    DsaPublic(DsaPublicKey),
}

impl KeyParams {
    pub fn shape(&self) -> KeyShape {
        match self {
            Self::RsaPrivate(_) => KeyShape::RsaPrivate,
            Self::RsaPublic(_) => KeyShape::RsaPublic,
            Self::DsaPrivate(_) => KeyShape::DsaPrivate,
            Self::DsaPublic(_) => KeyShape::DsaPublic,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.shape().algorithm()
    }

    pub fn is_private(&self) -> bool {
        self.shape().is_private()
    }

    /// The public half of this key. Public keys return themselves.
    pub fn public_params(&self) -> Option<KeyParams> {
        match self {
            Self::RsaPrivate(k) => Some(Self::RsaPublic(k.public_key())),
            Self::DsaPrivate(k) => k.public_key().map(Self::DsaPublic),
            Self::RsaPublic(_) | Self::DsaPublic(_) => Some(self.clone()),
        }
    }

    /// Flatten into a parameter-name mapping.
    pub fn to_named(&self) -> BTreeMap<String, BigUint> {
        let values: Vec<&BigUint> = match self {
            Self::RsaPrivate(k) => vec![&k.n, &k.e, &k.d, &k.p, &k.q, &k.dp, &k.dq, &k.invq],
            Self::RsaPublic(k) => vec![&k.n, &k.e],
            Self::DsaPrivate(k) => vec![&k.p, &k.q, &k.g, &k.x],
            Self::DsaPublic(k) => vec![&k.p, &k.q, &k.g, &k.y],
        };
        self.shape()
            .field_names()
            .iter()
            .zip(values)
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect()
    }

    /// Build a typed parameter set from a parameter-name mapping.
    ///
    /// The key set must be exactly one of the four shapes; partial or
    /// over-full maps fail with `InvalidParameters`.
    pub fn from_named(map: &BTreeMap<String, BigUint>) -> Result<Self> {
        let shape = KeyShape::detect(map.keys().map(String::as_str)).ok_or_else(|| {
            KeysyncError::InvalidParameters(format!(
                "parameter set {{{}}} matches no RSA/DSA key shape",
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;
        // `detect` guarantees every name below is present.
        let take = |name: &str| map[name].clone();
        Ok(match shape {
            KeyShape::RsaPrivate => Self::RsaPrivate(RsaPrivateKey {
                n: take("n"),
                e: take("e"),
                d: take("d"),
                p: take("p"),
                q: take("q"),
                dp: take("dp"),
                dq: take("dq"),
                invq: take("invq"),
            }),
            KeyShape::RsaPublic => Self::RsaPublic(RsaPublicKey {
                n: take("n"),
                e: take("e"),
            }),
            KeyShape::DsaPrivate => Self::DsaPrivate(DsaPrivateKey {
                p: take("p"),
                q: take("q"),
                g: take("g"),
                x: take("x"),
            }),
            KeyShape::DsaPublic => Self::DsaPublic(DsaPublicKey {
                p: take("p"),
                q: take("q"),
                g: take("g"),
                y: take("y"),
            }),
        })
    }
}

/// Identifies a key by its public value only, so secrets never reach
/// conflict reports or logs.
impl fmt::Display for KeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_private() { "private" } else { "public" };
        match self.public_params() {
            Some(KeyParams::RsaPublic(k)) => {
                write!(f, "RSA {kind} key (n={})", abbreviate(&k.n))
            }
            Some(KeyParams::DsaPublic(k)) => {
                write!(f, "DSA {kind} key (y={})", abbreviate(&k.y))
            }
            _ => write!(f, "{} {kind} key", self.algorithm()),
        }
    }
}

/// Short hex rendering of a large integer: first and last four bytes.
fn abbreviate(value: &BigUint) -> String {
    let bytes = value.to_bytes_be();
    if bytes.len() <= 8 {
        hex::encode(bytes)
    } else {
        format!(
            "{}..{}",
            hex::encode(&bytes[..4]),
            hex::encode(&bytes[bytes.len() - 4..])
        )
    }
}

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

/// A 160-bit key fingerprint as 40 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub const HEX_LEN: usize = 40;

    /// Parse a fingerprint as stored or displayed by a client.
    ///
    /// Whitespace is ignored and upper case is folded, so the grouped
    /// `"1A2B3C4D 5E6F..."` form is accepted too.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if normalized.len() != Self::HEX_LEN {
            return Err(KeysyncError::InvalidFingerprint(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                normalized.len()
            )));
        }
        if !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KeysyncError::InvalidFingerprint(format!(
                "non-hex character in {input:?}"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn from_digest(digest: &[u8; 20]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case, five groups of eight, as chat clients display it.
    pub fn grouped(&self) -> String {
        self.0
            .as_bytes()
            .chunks(8)
            .map(|chunk| String::from_utf8_lossy(chunk).to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = KeysyncError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = KeysyncError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Everything known about one identity's key, gathered from one or more
/// client applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Identity label; the join key across sources.
    #[serde(default)]
    pub name: String,
    /// Chat protocol identifier, e.g. `prpl-jabber`.
    pub protocol: Option<String>,
    pub account: Option<String>,
    pub fingerprint: Option<Fingerprint>,
    pub private_key: Option<KeyParams>,
    pub public_key: Option<KeyParams>,
    /// Application-specific extras (verification state, resource, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl KeyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Seed a record from an OpenPGP DSA subkey. A protected subkey only
    /// contributes its public half.
    pub fn from_dsa_key_pair(name: impl Into<String>, pair: &DsaKeyPair) -> Self {
        let record = Self::new(name).with_public_key(pair.public_params());
        match pair.private_params() {
            Some(private) => record.with_private_key(private),
            None => record,
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn with_private_key(mut self, key: KeyParams) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn with_public_key(mut self, key: KeyParams) -> Self {
        self.public_key = Some(key);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Label used when reporting on this record.
    pub fn identity(&self) -> &str {
        if self.name.is_empty() {
            "(unknown)"
        } else {
            &self.name
        }
    }
}

/// Records keyed by identity name.
///
/// Every map key equals its record's `name`. Deserialization enforces this:
/// an unnamed record takes its key, a record filed under another name is
/// `InvalidRecord`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyRecordCollection(BTreeMap<String, KeyRecord>);

impl KeyRecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the record's own name, returning any record it replaced.
    pub fn insert(&mut self, record: KeyRecord) -> Option<KeyRecord> {
        self.0.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&KeyRecord> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut KeyRecord> {
        self.0.get_mut(name)
    }

    pub fn entry(&mut self, name: String) -> btree_map::Entry<'_, String, KeyRecord> {
        self.0.entry(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, KeyRecord> {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> btree_map::ValuesMut<'_, String, KeyRecord> {
        self.0.values_mut()
    }
}

impl FromIterator<KeyRecord> for KeyRecordCollection {
    fn from_iter<I: IntoIterator<Item = KeyRecord>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}

impl TryFrom<BTreeMap<String, KeyRecord>> for KeyRecordCollection {
    type Error = KeysyncError;

    fn try_from(entries: BTreeMap<String, KeyRecord>) -> Result<Self> {
        let mut collection = Self::new();
        for (key, mut record) in entries {
            if record.name.is_empty() {
                record.name = key;
            } else if record.name != key {
                return Err(KeysyncError::InvalidRecord(format!(
                    "record \"{}\" is filed under \"{key}\"",
                    record.name
                )));
            }
            collection.insert(record);
        }
        Ok(collection)
    }
}

impl<'de> Deserialize<'de> for KeyRecordCollection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<String, KeyRecord>::deserialize(deserializer)?;
        Self::try_from(entries).map_err(de::Error::custom)
    }
}

impl IntoIterator for KeyRecordCollection {
    type Item = (String, KeyRecord);
    type IntoIter = btree_map::IntoIter<String, KeyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Two sources disagreed on a field. The first value seen is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConflict {
    pub identity: String,
    pub field: String,
    pub kept: String,
    pub discarded: String,
}

impl fmt::Display for FieldConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" values for \"{}\" did not match: \"{}\" != \"{}\"",
            self.field, self.identity, self.kept, self.discarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    fn named(pairs: &[(&str, u32)]) -> BTreeMap<String, BigUint> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), big(*v))).collect()
    }

    #[test]
    fn algorithm_oid_lookup() {
        assert_eq!(Algorithm::from_oid(&Algorithm::RSA_OID).unwrap(), Algorithm::Rsa);
        assert_eq!(Algorithm::from_oid(&Algorithm::DSA_OID).unwrap(), Algorithm::Dsa);
        assert_eq!(Algorithm::Dsa.oid().to_string(), "1.2.840.10040.4.1");
    }

    #[test]
    fn unknown_oid_rejected() {
        // id-ecPublicKey
        let ec = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
        let err = Algorithm::from_oid(&ec).unwrap_err();
        match err {
            KeysyncError::UnsupportedAlgorithm(oid) => assert_eq!(oid, "1.2.840.10045.2.1"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn shape_detection_is_exact() {
        assert_eq!(KeyShape::detect(["p", "q", "g", "x"]), Some(KeyShape::DsaPrivate));
        assert_eq!(KeyShape::detect(["e", "n"]), Some(KeyShape::RsaPublic));
        assert_eq!(KeyShape::detect(["p", "q", "g"]), None);
        assert_eq!(KeyShape::detect(["p", "q", "g", "x", "y"]), None);
    }

    #[test]
    fn named_round_trip() {
        let map = named(&[("p", 23), ("q", 11), ("g", 4), ("x", 7)]);
        let params = KeyParams::from_named(&map).unwrap();
        assert_eq!(params.shape(), KeyShape::DsaPrivate);
        assert_eq!(params.to_named(), map);
    }

    #[test]
    fn partial_named_map_rejected() {
        let map = named(&[("n", 33), ("e", 3), ("d", 7)]);
        assert!(matches!(
            KeyParams::from_named(&map),
            Err(KeysyncError::InvalidParameters(_))
        ));
    }

    #[test]
    fn dsa_public_value_derivation() {
        let key = DsaPrivateKey {
            p: big(23),
            q: big(11),
            g: big(4),
            x: big(7),
        };
        // 4^7 mod 23 = 16384 mod 23 = 8
        assert_eq!(key.public_key().unwrap().y, big(8));
    }

    #[test]
    fn key_display_hides_secret() {
        let key = KeyParams::DsaPrivate(DsaPrivateKey {
            p: big(23),
            q: big(11),
            g: big(4),
            x: big(7),
        });
        assert_eq!(key.to_string(), "DSA private key (y=08)");
    }

    #[test]
    fn fingerprint_parse_normalizes() {
        let fp = Fingerprint::parse("0123ABCD 4567EF01 89ABCDEF 01234567 89abcdef").unwrap();
        assert_eq!(fp.as_str(), "0123abcd4567ef0189abcdef0123456789abcdef");
        assert_eq!(fp.grouped(), "0123ABCD 4567EF01 89ABCDEF 01234567 89ABCDEF");
    }

    #[test]
    fn fingerprint_rejects_bad_input() {
        assert!(Fingerprint::parse("abc").is_err());
        assert!(Fingerprint::parse(&"g".repeat(40)).is_err());
    }

    #[test]
    fn collection_keys_by_name() {
        let collection: KeyRecordCollection = [
            KeyRecord::new("alice").with_protocol("prpl-jabber"),
            KeyRecord::new("bob"),
        ]
        .into_iter()
        .collect();
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.get("alice").unwrap().protocol.as_deref(),
            Some("prpl-jabber")
        );
    }

    #[test]
    fn collection_rejects_record_under_foreign_key() {
        let json = r#"{"alice": {"name": "bob", "protocol": "prpl-jabber"}}"#;
        let err = serde_json::from_str::<KeyRecordCollection>(json).unwrap_err();
        assert!(err.to_string().contains("filed under \"alice\""));

        let entries = BTreeMap::from([("alice".to_owned(), KeyRecord::new("bob"))]);
        assert!(matches!(
            KeyRecordCollection::try_from(entries),
            Err(KeysyncError::InvalidRecord(_))
        ));
    }

    #[test]
    fn collection_unnamed_record_takes_its_key() {
        let json = r#"{"alice": {"protocol": "prpl-jabber"}, "bob": {"name": "bob"}}"#;
        let collection: KeyRecordCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.get("alice").unwrap().name, "alice");
        for (key, record) in collection.iter() {
            assert_eq!(key, &record.name);
        }

        let back = serde_json::to_string(&collection).unwrap();
        assert_eq!(serde_json::from_str::<KeyRecordCollection>(&back).unwrap(), collection);
    }

    #[test]
    fn protected_pair_seeds_public_half_only() {
        let pair = DsaKeyPair {
            p: big(23),
            q: big(11),
            g: big(4),
            y: big(8),
            x: None,
        };
        assert!(pair.is_protected());
        assert_eq!(pair.private_params(), None);

        let record = KeyRecord::from_dsa_key_pair("alice", &pair);
        assert_eq!(record.private_key, None);
        assert_eq!(record.public_key, Some(pair.public_params()));

        let unlocked = DsaKeyPair { x: Some(big(7)), ..pair };
        let record = KeyRecord::from_dsa_key_pair("alice", &unlocked);
        assert_eq!(record.private_key.unwrap().shape(), KeyShape::DsaPrivate);
    }

    #[test]
    fn record_serde_round_trip() {
        let record = KeyRecord::new("alice")
            .with_protocol("prpl-jabber")
            .with_fingerprint(Fingerprint::parse(&"ab".repeat(20)).unwrap())
            .with_attribute("verified", "true");
        let json = serde_json::to_string(&record).unwrap();
        let back: KeyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
