//! # Deterministic secp256k1 ECDSA
//!
//! The group arithmetic comes from `k256`. What lives here is the part the
//! chain is picky about and that no off-the-shelf signer reproduces exactly:
//!
//! - an RFC 6979 style nonce derived with HMAC-SHA-256 from the private
//!   scalar and the message digest, salted with `attempt` zero bytes when
//!   the caller asks for another candidate;
//! - low-S normalization;
//! - public key recovery and the brute-force search for the recovery id.
//!
//! Everything is a pure function over immutable curve constants, so these
//! can be called from any number of threads at once.

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, U256};

use super::hash::{hmac_sha256, sha256};

/// Order `n` of the secp256k1 group, big-endian.
pub const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// A bare `(r, s)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcSignature {
    pub r: Scalar,
    pub s: Scalar,
}

impl EcSignature {
    pub fn r_bytes(&self) -> [u8; 32] {
        self.r.to_repr().into()
    }

    pub fn s_bytes(&self) -> [u8; 32] {
        self.s.to_repr().into()
    }

    /// Both components encode as exactly 32-byte DER integers.
    pub fn is_canonical(&self) -> bool {
        der_integer_len(&self.r_bytes()) == 32 && der_integer_len(&self.s_bytes()) == 32
    }

    /// `s` is in the lower half of the group order.
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }
}

/// Length of the minimal two's complement (DER `INTEGER`) encoding of an
/// unsigned big-endian value.
pub fn der_integer_len(value: &[u8; 32]) -> usize {
    match value.iter().position(|&b| b != 0) {
        None => 1,
        Some(first) => {
            let len = value.len() - first;
            if value[first] & 0x80 != 0 {
                len + 1
            } else {
                len
            }
        }
    }
}

/// Interprets a digest as an integer reduced modulo `n`.
pub fn digest_to_scalar(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest))
}

/// Parses a big-endian scalar strictly below `n`.
pub fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::from(*bytes)))
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Runs the HMAC-DRBG nonce generator and hands each in-range candidate to
/// `attempt` until it produces a value.
fn deterministic_generate_k<T>(
    digest: &[u8; 32],
    secret: &[u8; 32],
    attempt_salt: u32,
    mut attempt: impl FnMut(&Scalar) -> Option<T>,
) -> T {
    let digest = if attempt_salt > 0 {
        let mut salted = digest.to_vec();
        salted.resize(digest.len() + attempt_salt as usize, 0);
        sha256(&salted)
    } else {
        *digest
    };

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    k = hmac_sha256(&k, &[&v[..], &[0x00], secret, &digest].concat());
    v = hmac_sha256(&k, &v);
    k = hmac_sha256(&k, &[&v[..], &[0x01], secret, &digest].concat());
    v = hmac_sha256(&k, &v);
    v = hmac_sha256(&k, &v);

    loop {
        let candidate = scalar_from_bytes(&v).filter(|t| !bool::from(t.is_zero()));
        if let Some(result) = candidate.as_ref().and_then(&mut attempt) {
            return result;
        }
        k = hmac_sha256(&k, &[&v[..], &[0x00]].concat());
        v = hmac_sha256(&k, &v);
        v = hmac_sha256(&k, &v);
    }
}

/// Signs a 32-byte digest with the private scalar `d`.
///
/// `attempt_salt` selects which deterministic nonce stream to use; the first
/// call passes 0. The result always has low `s`, but is not necessarily
/// canonical in the DER-length sense. See [`EcSignature::is_canonical`].
pub fn sign_digest(digest: &[u8; 32], d: &Scalar, attempt_salt: u32) -> EcSignature {
    let e = digest_to_scalar(digest);
    let secret: [u8; 32] = d.to_repr().into();

    let EcSignature { r, mut s } = deterministic_generate_k(digest, &secret, attempt_salt, |k| {
        let point = ProjectivePoint::GENERATOR * k;
        if bool::from(point.is_identity()) {
            return None;
        }
        let r = <Scalar as Reduce<U256>>::reduce_bytes(&point.to_affine().x());
        if bool::from(r.is_zero()) {
            return None;
        }
        let k_inv = Option::<Scalar>::from(k.invert())?;
        let s = k_inv * (e + *d * r);
        if bool::from(s.is_zero()) {
            return None;
        }
        Some(EcSignature { r, s })
    });

    if bool::from(s.is_high()) {
        s = -s;
    }
    EcSignature { r, s }
}

// ---------------------------------------------------------------------------
// Verification & recovery
// ---------------------------------------------------------------------------

/// Plain ECDSA verification of `signature` over `digest` against `q`.
pub fn verify_digest(digest: &[u8; 32], signature: &EcSignature, q: &AffinePoint) -> bool {
    let EcSignature { r, s } = *signature;
    if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
        return false;
    }
    let Some(c) = Option::<Scalar>::from(s.invert()) else {
        return false;
    };
    let e = digest_to_scalar(digest);
    let u1 = e * c;
    let u2 = r * c;
    let point = ProjectivePoint::GENERATOR * u1 + ProjectivePoint::from(*q) * u2;
    if bool::from(point.is_identity()) {
        return false;
    }
    <Scalar as Reduce<U256>>::reduce_bytes(&point.to_affine().x()) == r
}

/// Adds `n` to a big-endian 256-bit value; `None` on overflow.
fn add_curve_order(value: &[u8; 32]) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = u16::from(value[i]) + u16::from(CURVE_ORDER[i]) + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    (carry == 0).then_some(out)
}

/// Reconstructs the public key from `(r, s)` and the two-bit recovery id
/// (SEC 1 §4.1.6). Returns `None` when the id does not name a valid point.
pub fn recover_public_key(
    digest: &[u8; 32],
    signature: &EcSignature,
    recovery_id: u8,
) -> Option<AffinePoint> {
    if recovery_id > 3 {
        return None;
    }
    let EcSignature { r, s } = *signature;
    if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
        return None;
    }

    let r_bytes: [u8; 32] = r.to_repr().into();
    let x = if recovery_id & 2 != 0 {
        add_curve_order(&r_bytes)?
    } else {
        r_bytes
    };
    // Rejects x >= p as well as x with no square root.
    let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(
        &FieldBytes::from(x),
        Choice::from(recovery_id & 1),
    ))?;

    let e_neg = -digest_to_scalar(digest);
    let r_inv = Option::<Scalar>::from(r.invert())?;
    let q = (ProjectivePoint::from(big_r) * s + ProjectivePoint::GENERATOR * e_neg) * r_inv;
    if bool::from(q.is_identity()) {
        return None;
    }
    Some(q.to_affine())
}

/// Finds the recovery id under which `signature` yields `q`.
pub fn calc_recovery_param(
    digest: &[u8; 32],
    signature: &EcSignature,
    q: &AffinePoint,
) -> Option<u8> {
    (0u8..4).find(|&i| recover_public_key(digest, signature, i).as_ref() == Some(q))
}
