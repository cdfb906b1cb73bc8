//! RSASSA-PKCS1-v1_5 with SHA-256 (RS256)

use crate::error::JwtError;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};

/// JOSE `alg` value handled by this crate.
pub const RS256: &str = "RS256";

/// Sign `message` with RS256.
#[inline]
pub(crate) fn sign_rs256(message: &[u8], signing_key: &SigningKey<Sha256>) -> Result<Vec<u8>, JwtError> {
    let signature = signing_key
        .try_sign(message)
        .map_err(|e| JwtError::SigningError(format!("RS256 signing failed: {e}")))?;
    Ok(signature.to_vec())
}

/// Verify an RS256 `signature` over `message`.
///
/// A signature that cannot even be parsed counts as a mismatch, so callers
/// scanning several keys simply move on to the next one.
#[inline]
pub(crate) fn verify_rs256(message: &[u8], signature: &[u8], verifying_key: &VerifyingKey<Sha256>) -> bool {
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}
