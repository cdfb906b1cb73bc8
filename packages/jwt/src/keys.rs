//! RSA key material, verification key sets and public JWK export.
//!
//! Keys are validated once, when they are constructed, and are immutable
//! afterwards. Each key is identified by its RFC 7638 SHA-256 thumbprint,
//! which is what the codec writes into the `kid` header.

use crate::algorithms::{RS256, base64_url_decode, base64_url_encode};
use crate::error::{JwtError, JwtResult};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Smallest accepted RSA modulus, in bits.
pub const MIN_MODULUS_BITS: usize = 2048;

/// An RSA key pair, or the public half of one.
#[derive(Clone)]
pub struct KeyMaterial {
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
    kid: String,
}

impl KeyMaterial {
    /// Build key material from a parsed private key.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the key is inconsistent (for example
    /// a private exponent that does not match the public exponent) or the
    /// modulus is shorter than [`MIN_MODULUS_BITS`].
    pub fn from_private_key(private: RsaPrivateKey) -> JwtResult<Self> {
        private
            .validate()
            .map_err(|e| JwtError::InvalidKey(format!("RSA private key failed validation: {e}")))?;
        let public = private.to_public_key();
        check_modulus(&public)?;
        let kid = thumbprint(&public);
        Ok(Self {
            public,
            private: Some(private),
            kid,
        })
    }

    /// Build public-only key material.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the modulus is too short.
    pub fn from_public_key(public: RsaPublicKey) -> JwtResult<Self> {
        check_modulus(&public)?;
        let kid = thumbprint(&public);
        Ok(Self {
            public,
            private: None,
            kid,
        })
    }

    /// Parse a PKCS#8 DER encoded RSA private key.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the DER is not an RSA PKCS#8 key or
    /// the key fails validation.
    pub fn from_pkcs8_der(der: &[u8]) -> JwtResult<Self> {
        let private = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA private key: {e}")))?;
        Self::from_private_key(private)
    }

    /// Parse an SPKI (`SubjectPublicKeyInfo`) DER encoded RSA public key.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the DER is not an RSA public key.
    pub fn from_public_key_der(der: &[u8]) -> JwtResult<Self> {
        let public = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA public key: {e}")))?;
        Self::from_public_key(public)
    }

    /// Build public-only key material from big-endian modulus and exponent.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] for a zero modulus or an exponent the
    /// RSA implementation refuses.
    pub fn from_public_components(n: &[u8], e: &[u8]) -> JwtResult<Self> {
        let public = public_from_components(n, e)?;
        Self::from_public_key(public)
    }

    /// Build a key pair from big-endian components.
    ///
    /// `primes` holds the prime factors of `n`; the CRT values are derived.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if the components do not form a valid
    /// key pair.
    pub fn from_private_components(n: &[u8], e: &[u8], d: &[u8], primes: &[&[u8]]) -> JwtResult<Self> {
        // Reject the degenerate public half before handing it to the RSA code.
        public_from_components(n, e)?;
        let primes = primes.iter().map(|p| BigUint::from_bytes_be(p)).collect();
        let private = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(n),
            BigUint::from_bytes_be(e),
            BigUint::from_bytes_be(d),
            primes,
        )
        .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA key components: {e}")))?;
        Self::from_private_key(private)
    }

    /// Import an RSA public JWK.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if `kty` is not `RSA`, `alg` names an
    /// algorithm other than RS256, `n`/`e` are not base64url, or a `kid` is
    /// present and differs from the key's thumbprint.
    pub fn from_public_jwk(jwk: &PublicJwk) -> JwtResult<Self> {
        if jwk.kty != "RSA" {
            return Err(JwtError::InvalidKey(format!("Unsupported JWK key type: {}", jwk.kty)));
        }
        if let Some(alg) = jwk.alg.as_deref() {
            if alg != RS256 {
                return Err(JwtError::InvalidKey(format!("JWK is bound to algorithm {alg}")));
            }
        }
        let n = base64_url_decode(&jwk.n).map_err(|e| JwtError::InvalidKey(format!("JWK modulus: {e}")))?;
        let e = base64_url_decode(&jwk.e).map_err(|e| JwtError::InvalidKey(format!("JWK exponent: {e}")))?;
        let key = Self::from_public_components(&n, &e)?;
        if let Some(kid) = jwk.kid.as_deref() {
            if kid != key.kid {
                return Err(JwtError::InvalidKey(format!(
                    "JWK kid {kid} does not match key thumbprint {}",
                    key.kid
                )));
            }
        }
        Ok(key)
    }

    /// Key identifier (RFC 7638 SHA-256 thumbprint, base64url).
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Whether this key carries a private component.
    #[must_use]
    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// Modulus length in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.public.n().bits()
    }

    /// The public key.
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub(crate) fn private_key(&self) -> Option<&RsaPrivateKey> {
        self.private.as_ref()
    }

    /// Public-only copy of this key with the same identifier.
    #[must_use]
    pub fn public_half(&self) -> Self {
        Self {
            public: self.public.clone(),
            private: None,
            kid: self.kid.clone(),
        }
    }

    /// Re-run structural validation.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if validation fails.
    pub fn validate(&self) -> JwtResult<()> {
        check_modulus(&self.public)?;
        if let Some(private) = &self.private {
            private
                .validate()
                .map_err(|e| JwtError::InvalidKey(format!("RSA private key failed validation: {e}")))?;
            if private.to_public_key() != self.public {
                return Err(JwtError::invalid_key("private key does not match public key"));
            }
        }
        Ok(())
    }

    /// Export the public half as a JWK suitable for a JWKS document.
    #[must_use]
    pub fn to_public_jwk(&self) -> PublicJwk {
        PublicJwk {
            kty: "RSA".to_string(),
            key_use: Some("sig".to_string()),
            alg: Some(RS256.to_string()),
            kid: Some(self.kid.clone()),
            n: base64_url_encode(&self.public.n().to_bytes_be()),
            e: base64_url_encode(&self.public.e().to_bytes_be()),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kid", &self.kid)
            .field("modulus_bits", &self.modulus_bits())
            .field("has_private", &self.has_private())
            .finish()
    }
}

fn public_from_components(n: &[u8], e: &[u8]) -> JwtResult<RsaPublicKey> {
    if n.iter().all(|b| *b == 0) {
        return Err(JwtError::invalid_key("RSA modulus must be positive"));
    }
    RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA public key: {e}")))
}

fn check_modulus(public: &RsaPublicKey) -> JwtResult<()> {
    let bits = public.n().bits();
    if bits < MIN_MODULUS_BITS {
        return Err(JwtError::InvalidKey(format!(
            "RSA modulus must be at least {MIN_MODULUS_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

/// RFC 7638 thumbprint: SHA-256 over the required members in lexicographic order.
fn thumbprint(public: &RsaPublicKey) -> String {
    let e = base64_url_encode(&public.e().to_bytes_be());
    let n = base64_url_encode(&public.n().to_bytes_be());
    let canonical = format!(r#"{{"e":"{e}","kty":"RSA","n":"{n}"}}"#);
    base64_url_encode(&Sha256::digest(canonical.as_bytes()))
}

/// RSA public key in JWK form (RFC 7517 / RFC 7518 §6.3.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicJwk {
    /// Key type, always `RSA` here.
    pub kty: String,
    /// Intended use (`sig`).
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Algorithm the key is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Modulus, base64url big-endian.
    pub n: String,
    /// Public exponent, base64url big-endian.
    pub e: String,
}

/// A JWK Set document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    /// Public keys.
    pub keys: Vec<PublicJwk>,
}

/// Ordered, de-duplicated, non-empty set of public keys used for verification.
#[derive(Debug, Clone)]
pub struct VerificationKeySet {
    keys: Vec<KeyMaterial>,
}

impl VerificationKeySet {
    /// Build a set from key material, keeping only public halves.
    ///
    /// Insertion order is preserved; a key whose identifier was already seen
    /// is dropped.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if no keys are given.
    pub fn new<I>(keys: I) -> JwtResult<Self>
    where
        I: IntoIterator<Item = KeyMaterial>,
    {
        let mut seen = HashSet::new();
        let keys: Vec<KeyMaterial> = keys
            .into_iter()
            .filter(|key| seen.insert(key.kid.clone()))
            .map(|key| key.public_half())
            .collect();
        if keys.is_empty() {
            return Err(JwtError::invalid_key("verification key set must not be empty"));
        }
        Ok(Self { keys })
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; an empty set cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyMaterial> {
        self.keys.iter()
    }

    /// Look up a key by identifier.
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&KeyMaterial> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    /// Whether a key with this identifier is present.
    #[must_use]
    pub fn contains(&self, kid: &str) -> bool {
        self.get(kid).is_some()
    }

    /// Export the set as a JWKS document.
    #[must_use]
    pub fn to_jwks(&self) -> Jwks {
        Jwks {
            keys: self.keys.iter().map(KeyMaterial::to_public_jwk).collect(),
        }
    }
}

impl TryFrom<Vec<KeyMaterial>> for VerificationKeySet {
    type Error = JwtError;

    fn try_from(keys: Vec<KeyMaterial>) -> JwtResult<Self> {
        Self::new(keys)
    }
}

impl TryFrom<&Jwks> for VerificationKeySet {
    type Error = JwtError;

    fn try_from(jwks: &Jwks) -> JwtResult<Self> {
        let keys = jwks
            .keys
            .iter()
            .map(KeyMaterial::from_public_jwk)
            .collect::<JwtResult<Vec<_>>>()?;
        Self::new(keys)
    }
}
