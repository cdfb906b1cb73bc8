//! Key configuration: base64url-encoded DER keys and JWKs to a [`TokenCodec`].
//!
//! Nothing here reads files or the environment; callers pass in the strings
//! they loaded from wherever their secrets live.
//!
//! ```json
//! {
//!   "signing_key": "<base64url PKCS#8 DER>",
//!   "verification_keys": [
//!     "<base64url PKCS#8 or SPKI DER>",
//!     { "kty": "RSA", "n": "...", "e": "AQAB" }
//!   ]
//! }
//! ```

use crate::{
    algorithms::base64_url_decode,
    codec::TokenCodec,
    error::{JwtError, JwtResult},
    keys::{KeyMaterial, PublicJwk},
};
use serde::Deserialize;
use zeroize::Zeroizing;

/// Signing and verification keys as they appear in configuration.
#[derive(Deserialize)]
pub struct KeyConfig {
    /// Active signing key: base64url (no padding) PKCS#8 DER.
    pub signing_key: Zeroizing<String>,
    /// Keys accepted for verification, in scan order. Empty means "the
    /// signing key's public half only".
    #[serde(default)]
    pub verification_keys: Vec<VerificationKeyConfig>,
}

/// One verification key entry.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum VerificationKeyConfig {
    /// base64url DER: PKCS#8 private key or SPKI public key.
    Encoded(Zeroizing<String>),
    /// RSA public JWK.
    Jwk(PublicJwk),
}

impl KeyConfig {
    /// Parse a JSON key configuration.
    ///
    /// # Errors
    /// Returns [`JwtError::Config`] if the JSON does not match the expected shape.
    pub fn from_json(json: &str) -> JwtResult<Self> {
        serde_json::from_str(json).map_err(|e| JwtError::Config(e.to_string()))
    }

    /// Decode every key and construct the codec.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if a key cannot be decoded or fails
    /// validation.
    pub fn build(&self) -> JwtResult<TokenCodec> {
        let signing_key = decode_private_key(&self.signing_key)?;
        let verification_keys = if self.verification_keys.is_empty() {
            vec![signing_key.public_half()]
        } else {
            self.verification_keys
                .iter()
                .map(VerificationKeyConfig::decode)
                .collect::<JwtResult<Vec<_>>>()?
        };
        TokenCodec::new(signing_key, verification_keys)
    }
}

impl VerificationKeyConfig {
    /// Decode this entry into key material.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the entry is neither a PKCS#8
    /// private key, an SPKI public key nor a valid RSA JWK.
    pub fn decode(&self) -> JwtResult<KeyMaterial> {
        match self {
            Self::Encoded(encoded) => {
                let der = decode_der(encoded)?;
                KeyMaterial::from_pkcs8_der(&der)
                    .or_else(|_| KeyMaterial::from_public_key_der(&der))
                    .map_err(|_| JwtError::invalid_key("neither a PKCS#8 private key nor an SPKI public key"))
            }
            Self::Jwk(jwk) => KeyMaterial::from_public_jwk(jwk),
        }
    }
}

/// Decode a base64url (no padding) PKCS#8 DER RSA private key.
///
/// # Errors
/// Returns [`JwtError::InvalidKey`] if decoding or validation fails.
pub fn decode_private_key(encoded: &str) -> JwtResult<KeyMaterial> {
    KeyMaterial::from_pkcs8_der(&decode_der(encoded)?)
}

/// Decode a base64url (no padding) SPKI DER RSA public key.
///
/// # Errors
/// Returns [`JwtError::InvalidKey`] if decoding or validation fails.
pub fn decode_public_key(encoded: &str) -> JwtResult<KeyMaterial> {
    KeyMaterial::from_public_key_der(&decode_der(encoded)?)
}

fn decode_der(encoded: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
    base64_url_decode(encoded.trim())
        .map(Zeroizing::new)
        .map_err(|e| JwtError::InvalidKey(format!("key is not base64url: {e}")))
}
