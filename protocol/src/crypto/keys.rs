//! # Key Management
//!
//! secp256k1 private and public keys in the formats the chain understands.
//!
//! Every Delegato account has an `owner` and an `active` key, and neither is
//! ever generated at random: both are derived from the account's email and
//! password (see [`PrivateKey::derive`]). That makes the password the real
//! secret. Anyone who knows it can rebuild the keys, and nothing needs to be
//! stored on disk.
//!
//! ## Textual forms
//!
//! - Private keys use WIF: Base58 of `0x80 ∥ d ∥ checksum`, where the
//!   checksum is the first four bytes of double SHA-256.
//! - Public keys use `BTS` followed by Base58 of
//!   `compressed point ∥ ripemd160(point)[..4]`.
//!
//! ## Security considerations
//!
//! - `Debug` on [`PrivateKey`] prints the public half only. If you need the
//!   WIF in a log line, you are doing something wrong.
//! - The public key is derived lazily and cached; the scalar never changes
//!   after construction so the cache never goes stale.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, NonZeroScalar, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use super::hash::{double_sha256_checksum, ripemd160, ripemd160_checksum, sha256};
use crate::codec::{ChainValue, ValidationError};
use crate::config::{
    ADDRESS_PREFIX, ADDRESS_VERSION, CHECKSUM_LENGTH, MIN_PASSWORD_LENGTH, WIF_VERSION,
};

/// Length of a SEC1 compressed point.
pub const COMPRESSED_KEY_LENGTH: usize = 33;

// ---------------------------------------------------------------------------
// Key roles & brain keys
// ---------------------------------------------------------------------------

/// Which of an account's two authorities a derived key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Day-to-day key: votes, delegations, profile updates.
    Active,
    /// Recovery key: can replace the active key.
    Owner,
}

impl KeyRole {
    pub const ALL: [KeyRole; 2] = [KeyRole::Active, KeyRole::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyRole::Active => "active",
            KeyRole::Owner => "owner",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(KeyRole::Active),
            "owner" => Ok(KeyRole::Owner),
            _ => Err(ValidationError::InvalidKey("unknown key role")),
        }
    }
}

/// Trims a brain key and collapses each run of ASCII whitespace to a
/// single space.
pub fn normalize_brain_key(brain_key: &str) -> Result<String, ValidationError> {
    let trimmed = brain_key.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyBrainKey);
    }
    let words: Vec<&str> = trimmed
        .split(|c: char| matches!(c, '\t' | '\n' | '\x0b' | '\x0c' | '\r' | ' '))
        .filter(|word| !word.is_empty())
        .collect();
    Ok(words.join(" "))
}

// ---------------------------------------------------------------------------
// Private key
// ---------------------------------------------------------------------------

/// A secp256k1 private scalar in `[1, n - 1]`.
///
/// # Examples
///
/// ```
/// use delegato_protocol::crypto::keys::{KeyRole, PrivateKey};
///
/// let key = PrivateKey::derive("alice@example.com", "correct horse battery", KeyRole::Active)
///     .unwrap();
/// let again = PrivateKey::from_wif(&key.to_wif()).unwrap();
/// assert_eq!(key, again);
/// ```
#[derive(Clone)]
pub struct PrivateKey {
    secret: NonZeroScalar,
    public: OnceLock<PublicKey>,
}

impl PrivateKey {
    /// Wraps 32 big-endian bytes. Zero and values `>= n` are rejected.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, ValidationError> {
        let secret = Option::<NonZeroScalar>::from(NonZeroScalar::from_repr((*bytes).into()))
            .ok_or(ValidationError::InvalidKey("private scalar out of range"))?;
        Ok(Self {
            secret,
            public: OnceLock::new(),
        })
    }

    /// Parses 64 hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let raw = crate::codec::decode_hex(hex)?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::InvalidLength {
                expected: 32,
                actual: raw.len(),
            })?;
        Self::from_bytes(&bytes)
    }

    /// Uses `SHA-256(seed)` as the scalar.
    pub fn from_seed(seed: &[u8]) -> Result<Self, ValidationError> {
        Self::from_bytes(&sha256(seed))
    }

    /// Derives the `role` key of an account from its credentials.
    ///
    /// The seed is `account ∥ role ∥ password` run through
    /// [`normalize_brain_key`], so the same inputs always give the same key.
    pub fn derive(account: &str, password: &str, role: KeyRole) -> Result<Self, ValidationError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        let seed = normalize_brain_key(&format!("{account}{role}{password}"))?;
        Self::from_seed(seed.as_bytes())
    }

    /// Derives one key per role in `roles`.
    pub fn derive_roles(
        account: &str,
        password: &str,
        roles: &[KeyRole],
    ) -> Result<Vec<(KeyRole, PrivateKey)>, ValidationError> {
        roles
            .iter()
            .map(|&role| Ok((role, Self::derive(account, password, role)?)))
            .collect()
    }

    /// Decodes a WIF string, verifying version and checksum.
    pub fn from_wif(wif: &str) -> Result<Self, ValidationError> {
        let raw = bs58::decode(wif)
            .into_vec()
            .map_err(|e| ValidationError::InvalidBase58(e.to_string()))?;
        if raw.len() != 1 + 32 + CHECKSUM_LENGTH {
            return Err(ValidationError::InvalidLength {
                expected: 1 + 32 + CHECKSUM_LENGTH,
                actual: raw.len(),
            });
        }
        let (payload, checksum) = raw.split_at(1 + 32);
        if payload[0] != WIF_VERSION {
            return Err(ValidationError::InvalidVersion {
                expected: WIF_VERSION,
                actual: payload[0],
            });
        }
        if double_sha256_checksum(payload) != checksum {
            return Err(ValidationError::ChecksumMismatch);
        }
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(&payload[1..]);
        Self::from_bytes(&scalar)
    }

    /// Encodes as WIF. The scalar is always written as a full 32 bytes.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(1 + 32 + CHECKSUM_LENGTH);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.to_bytes_array());
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        bs58::encode(payload).into_string()
    }

    pub fn to_bytes_array(&self) -> [u8; 32] {
        self.secret.to_repr().into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes_array())
    }

    /// The scalar `d`.
    pub fn scalar(&self) -> &Scalar {
        self.secret.as_ref()
    }

    /// `Q = d·G`, computed on first use.
    pub fn public_key(&self) -> &PublicKey {
        self.public.get_or_init(|| {
            PublicKey::from_inner(k256::PublicKey::from_secret_scalar(&self.secret))
        })
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes_array() == other.to_bytes_array()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public_key().to_wif())
            .finish_non_exhaustive()
    }
}

impl FromStr for PrivateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wif(s)
    }
}

/// JSON form is the WIF; bytes are the raw scalar.
impl ChainValue for PrivateKey {
    fn value(&self) -> Value {
        Value::String(self.to_wif())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bytes_array());
    }
}

// ---------------------------------------------------------------------------
// Public key
// ---------------------------------------------------------------------------

/// A secp256k1 point, always handled in compressed form.
///
/// As a chain value a public key serializes as a single-key authority
/// (threshold 1, one key of weight 1), which is the shape every `owner` and
/// `active` field of an operation expects.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    fn from_inner(inner: k256::PublicKey) -> Self {
        Self { inner }
    }

    /// Parses a SEC1 encoded point (compressed or not).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(Self::from_inner)
            .map_err(|_| ValidationError::InvalidKey("not a secp256k1 point"))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        Self::from_sec1_bytes(&crate::codec::decode_hex(hex)?)
    }

    pub fn from_affine(point: AffinePoint) -> Result<Self, ValidationError> {
        k256::PublicKey::from_affine(point)
            .map(Self::from_inner)
            .map_err(|_| ValidationError::InvalidKey("point at infinity"))
    }

    /// Decodes `BTS…`, verifying the prefix and checksum.
    pub fn from_wif(wif: &str) -> Result<Self, ValidationError> {
        let body = wif
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or(ValidationError::InvalidPrefix {
                expected: ADDRESS_PREFIX,
            })?;
        let raw = bs58::decode(body)
            .into_vec()
            .map_err(|e| ValidationError::InvalidBase58(e.to_string()))?;
        if raw.len() <= CHECKSUM_LENGTH {
            return Err(ValidationError::InvalidLength {
                expected: COMPRESSED_KEY_LENGTH + CHECKSUM_LENGTH,
                actual: raw.len(),
            });
        }
        let (point, checksum) = raw.split_at(raw.len() - CHECKSUM_LENGTH);
        if ripemd160_checksum(point) != checksum {
            return Err(ValidationError::ChecksumMismatch);
        }
        Self::from_sec1_bytes(point)
    }

    /// The 33-byte SEC1 compressed encoding.
    pub fn compressed(&self) -> [u8; COMPRESSED_KEY_LENGTH] {
        let encoded = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_KEY_LENGTH];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    pub fn to_wif(&self) -> String {
        let compressed = self.compressed();
        let mut payload = compressed.to_vec();
        payload.extend_from_slice(&ripemd160_checksum(&compressed));
        format!("{ADDRESS_PREFIX}{}", bs58::encode(payload).into_string())
    }

    /// Base58 address: `0x38 ∥ ripemd160(sha256(point)) ∥ checksum`.
    pub fn address(&self) -> String {
        let mut payload = Vec::with_capacity(1 + 20 + CHECKSUM_LENGTH);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&ripemd160(&sha256(&self.compressed())));
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        bs58::encode(payload).into_string()
    }

    pub fn as_affine(&self) -> &AffinePoint {
        self.inner.as_affine()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_wif()).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wif())
    }
}

impl FromStr for PublicKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wif(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wif())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wif = String::deserialize(deserializer)?;
        Self::from_wif(&wif).map_err(serde::de::Error::custom)
    }
}

impl ChainValue for PublicKey {
    fn value(&self) -> Value {
        json!({
            "weight_threshold": 1,
            "account_auths": [],
            "key_auths": [[self.to_wif(), 1]],
            "address_auths": [],
        })
    }

    /// `weight_threshold: u32 = 1`, no account auths, one key auth with
    /// weight `u16 = 1`, no address auths.
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&1u32.to_le_bytes());
        out.push(0);
        out.push(1);
        out.extend_from_slice(&self.compressed());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PrivateKey {
        PrivateKey::derive("alice@example.com", "correct horse battery", KeyRole::Active)
            .expect("derive")
    }

    #[test]
    fn brain_key_normalization() {
        assert_eq!(normalize_brain_key("  a \t b\n\nc  ").unwrap(), "a b c");
        assert_eq!(normalize_brain_key("single").unwrap(), "single");
        assert_eq!(normalize_brain_key(" \t\n "), Err(ValidationError::EmptyBrainKey));
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(alice(), alice());
        let owner =
            PrivateKey::derive("alice@example.com", "correct horse battery", KeyRole::Owner)
                .unwrap();
        assert_ne!(alice(), owner);
    }

    #[test]
    fn derivation_matches_seed_formula() {
        let expected = PrivateKey::from_seed(b"alice@example.comactivecorrect horse battery")
            .unwrap();
        assert_eq!(alice(), expected);
    }

    #[test]
    fn short_password_is_rejected() {
        assert_eq!(
            PrivateKey::derive("alice", "elevenchars", KeyRole::Active),
            Err(ValidationError::PasswordTooShort { min: 12 })
        );
        assert!(PrivateKey::derive("alice", "twelve chars", KeyRole::Active).is_ok());
    }

    #[test]
    fn derive_roles_returns_each_role() {
        let keys = PrivateKey::derive_roles("bob", "a long enough pass", &KeyRole::ALL).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].0, KeyRole::Active);
        assert_eq!(keys[1].0, KeyRole::Owner);
    }

    #[test]
    fn wif_round_trip_and_known_vector() {
        let key = alice();
        assert_eq!(PrivateKey::from_wif(&key.to_wif()).unwrap(), key);

        // Well-known WIF test vector (scalar 0x0c28fca3...).
        let wif = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
        let decoded = PrivateKey::from_wif(wif).unwrap();
        assert_eq!(
            decoded.to_hex(),
            "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"
        );
        assert_eq!(decoded.to_wif(), wif);
    }

    #[test]
    fn corrupted_wif_is_rejected() {
        let wif = alice().to_wif();
        let mut chars: Vec<char> = wif.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '1' { '2' } else { '1' };
        let corrupted: String = chars.into_iter().collect();
        assert!(PrivateKey::from_wif(&corrupted).is_err());
    }

    #[test]
    fn wrong_wif_version_is_rejected() {
        let mut payload = vec![0x81];
        payload.extend_from_slice(&[7u8; 32]);
        let checksum = double_sha256_checksum(&payload);
        payload.extend_from_slice(&checksum);
        let wif = bs58::encode(payload).into_string();
        assert!(matches!(
            PrivateKey::from_wif(&wif),
            Err(ValidationError::InvalidVersion { expected: 0x80, actual: 0x81 })
        ));
    }

    #[test]
    fn zero_scalar_is_rejected() {
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn public_key_wif_round_trip() {
        let public = alice().public_key().clone();
        let wif = public.to_wif();
        assert!(wif.starts_with("BTS"));
        assert_eq!(PublicKey::from_wif(&wif).unwrap(), public);
    }

    #[test]
    fn public_key_rejects_bad_prefix_and_checksum() {
        let wif = alice().public_key().to_wif();
        let foreign = format!("STM{}", &wif[3..]);
        assert!(matches!(
            PublicKey::from_wif(&foreign),
            Err(ValidationError::InvalidPrefix { .. })
        ));
        let mut raw = bs58::decode(&wif[3..]).into_vec().unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        let tampered = format!("BTS{}", bs58::encode(raw).into_string());
        assert_eq!(PublicKey::from_wif(&tampered), Err(ValidationError::ChecksumMismatch));
    }

    #[test]
    fn generator_public_key() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = PrivateKey::from_bytes(&one).unwrap();
        assert_eq!(
            hex::encode(key.public_key().compressed()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn authority_encoding() {
        let public = alice().public_key().clone();
        let expected = format!("010000000001{}010000", hex::encode(public.compressed()));
        assert_eq!(public.bytes(), expected);
        assert_eq!(
            public.value(),
            json!({
                "weight_threshold": 1,
                "account_auths": [],
                "key_auths": [[public.to_wif(), 1]],
                "address_auths": [],
            })
        );
    }

    #[test]
    fn address_has_version_and_checksum() {
        let address = alice().public_key().address();
        let raw = bs58::decode(&address).into_vec().unwrap();
        assert_eq!(raw.len(), 25);
        assert_eq!(raw[0], ADDRESS_VERSION);
        assert_eq!(&raw[21..], &double_sha256_checksum(&raw[..21]));
    }

    #[test]
    fn private_key_chain_value() {
        let key = alice();
        assert_eq!(key.value(), json!(key.to_wif()));
        assert_eq!(key.bytes(), key.to_hex());
    }

    #[test]
    fn debug_hides_scalar() {
        let key = alice();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains(&key.to_hex()));
        assert!(!rendered.contains(&key.to_wif()));
    }
}
