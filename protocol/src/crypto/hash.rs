//! # Hashing Utilities
//!
//! The hash functions the chain's key formats and signatures are built on.
//! None of these are our choice; they are what the node and every other
//! client use, so they are what we use:
//!
//! - **SHA-256** for transaction digests, seed derivation and the nonce
//!   HMAC.
//! - **double SHA-256** for WIF and address checksums.
//! - **RIPEMD-160** for public key checksums and address payloads.
//!
//! All functions return fixed-size arrays. The callers almost always slice
//! a checksum off the front or feed the digest straight into a scalar, and
//! neither wants a heap allocation.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::config::CHECKSUM_LENGTH;

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of `data`.
///
/// # Example
///
/// ```
/// use delegato_protocol::crypto::sha256;
///
/// let hash = sha256(b"delegato");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// HMAC-SHA-256 of `data` under `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// First four bytes of `double_sha256(data)`.
pub fn double_sha256_checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = double_sha256(data);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// First four bytes of `ripemd160(data)`.
pub fn ripemd160_checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = ripemd160(data);
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn double_sha256_is_hash_of_hash() {
        assert_eq!(double_sha256(b"abc"), sha256(&sha256(b"abc")));
    }

    #[test]
    fn ripemd160_known_vector() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn hmac_key_longer_than_block() {
        // RFC 4231 case 6: a 131 byte key gets hashed down first.
        let mac = hmac_sha256(
            &[0xaa; 131],
            b"Test Using Larger Than Block-Size Key - Hash Key First",
        );
        assert_eq!(
            hex::encode(mac),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
        assert_eq!(hmac_sha256(b"", b"").len(), 32);
    }

    #[test]
    fn checksums_are_digest_prefixes() {
        assert_eq!(double_sha256_checksum(b"x"), double_sha256(b"x")[..4]);
        assert_eq!(ripemd160_checksum(b"x"), ripemd160(b"x")[..4]);
    }
}
