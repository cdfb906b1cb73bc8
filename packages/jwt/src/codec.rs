//! RS256 token codec.
//!
//! A [`TokenCodec`] signs with exactly one private key and verifies against
//! an ordered set of public keys, so tokens issued under a previous signing
//! key keep verifying while that key's public half stays in the set.

use crate::{
    algorithms::{
        RS256, base64_url_encode,
        rs256::{sign_rs256, verify_rs256},
    },
    claims::{Claims, REGISTERED_CLAIMS},
    error::{JwtError, JwtResult},
    keys::{Jwks, KeyMaterial, VerificationKeySet},
    types::{Header, Token},
};
use chrono::Utc;
use rsa::pkcs1v15::{SigningKey, VerifyingKey};
use sha2::Sha256;
use std::fmt;
use tracing::{debug, trace, warn};

/// Signs claim sets and verifies compact RS256 tokens.
///
/// Immutable after construction; `sign` and `verify` take `&self` and may be
/// called from any number of threads at once.
pub struct TokenCodec {
    signing_kid: String,
    signer: SigningKey<Sha256>,
    verification_keys: VerificationKeySet,
    verifiers: Vec<(String, VerifyingKey<Sha256>)>,
}

impl TokenCodec {
    /// Create a codec from a signing key pair and the keys accepted for
    /// verification.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] if `signing_key` has no private
    /// component, `verification_keys` is empty, or any key fails validation.
    pub fn new<I>(signing_key: KeyMaterial, verification_keys: I) -> JwtResult<Self>
    where
        I: IntoIterator<Item = KeyMaterial>,
    {
        Self::from_key_set(signing_key, VerificationKeySet::new(verification_keys)?)
    }

    /// Create a codec from an already assembled verification key set.
    ///
    /// # Errors
    /// Same as [`TokenCodec::new`].
    pub fn from_key_set(signing_key: KeyMaterial, verification_keys: VerificationKeySet) -> JwtResult<Self> {
        let private = signing_key
            .private_key()
            .ok_or_else(|| JwtError::invalid_key("signing key has no private component"))?;
        signing_key.validate()?;
        for key in verification_keys.iter() {
            key.validate()?;
        }

        let signing_kid = signing_key.kid().to_string();
        if !verification_keys.contains(&signing_kid) {
            warn!(kid = %signing_kid, "signing key is not in the verification key set");
        }

        let verifiers = verification_keys
            .iter()
            .map(|key| {
                (
                    key.kid().to_string(),
                    VerifyingKey::<Sha256>::new(key.public_key().clone()),
                )
            })
            .collect();

        debug!(
            kid = %signing_kid,
            verification_keys = verification_keys.len(),
            "token codec initialised"
        );

        Ok(Self {
            signing_kid,
            signer: SigningKey::<Sha256>::new(private.clone()),
            verification_keys,
            verifiers,
        })
    }

    /// Identifier written into the `kid` header of issued tokens.
    #[must_use]
    pub fn signing_kid(&self) -> &str {
        &self.signing_kid
    }

    /// Keys accepted for verification, in scan order.
    #[must_use]
    pub fn verification_keys(&self) -> &VerificationKeySet {
        &self.verification_keys
    }

    /// Verification keys as a JWKS document.
    #[must_use]
    pub fn jwks(&self) -> Jwks {
        self.verification_keys.to_jwks()
    }

    /// Sign `claims` into a compact token, stamping `iat` with the current
    /// time when it is absent.
    ///
    /// # Errors
    /// See [`TokenCodec::sign_at`].
    pub fn sign(&self, claims: &Claims) -> JwtResult<Vec<u8>> {
        self.sign_at(claims, Utc::now().timestamp())
    }

    /// Sign `claims` using `now` (unix seconds) as the default `iat`.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidClaims`] for an empty subject, a registered
    /// claim name in [`Claims::extra`], or an `exp` not strictly after `iat`;
    /// [`JwtError::Serialization`] or [`JwtError::SigningError`] otherwise.
    pub fn sign_at(&self, claims: &Claims, now: i64) -> JwtResult<Vec<u8>> {
        if claims.sub.is_empty() {
            return Err(JwtError::invalid_claims("subject must not be empty"));
        }
        if let Some(name) = claims
            .extra
            .keys()
            .find(|name| REGISTERED_CLAIMS.contains(&name.as_str()))
        {
            return Err(JwtError::InvalidClaims(format!(
                "registered claim {name} must not be set as a custom claim"
            )));
        }

        let iat = claims.iat.unwrap_or(now);
        if let Some(exp) = claims.exp {
            if exp <= iat {
                return Err(JwtError::InvalidClaims(format!(
                    "expiry {exp} must be after issued-at {iat}"
                )));
            }
        }

        let mut claims = claims.clone();
        claims.iat = Some(iat);

        let header = Header::rs256(self.signing_kid.as_str());
        let header_json =
            serde_json::to_vec(&header).map_err(|e| JwtError::Serialization(e.to_string()))?;
        let payload_json =
            serde_json::to_vec(&claims).map_err(|e| JwtError::Serialization(e.to_string()))?;

        let message = format!(
            "{}.{}",
            base64_url_encode(&header_json),
            base64_url_encode(&payload_json)
        );
        let signature = sign_rs256(message.as_bytes(), &self.signer)?;

        debug!(kid = %self.signing_kid, "token signed");
        Ok(format!("{message}.{}", base64_url_encode(&signature)).into_bytes())
    }

    /// Verify a compact token against the current time and return its claims.
    ///
    /// # Errors
    /// See [`TokenCodec::verify_at`].
    pub fn verify(&self, token: &[u8]) -> JwtResult<Claims> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a compact token with `now` (unix seconds) as the current time.
    ///
    /// With a `kid` header only the matching key is tried. Without one, every
    /// verification key is tried in insertion order and the first that
    /// accepts the signature wins.
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`], [`JwtError::UnsupportedAlgorithm`],
    /// [`JwtError::UnknownKey`], [`JwtError::SignatureInvalid`],
    /// [`JwtError::MalformedClaims`], [`JwtError::TokenExpired`] or
    /// [`JwtError::TokenNotYetValid`], in pipeline order.
    pub fn verify_at(&self, token: &[u8], now: i64) -> JwtResult<Claims> {
        let result = self.verify_pipeline(token, now);
        if let Err(e) = &result {
            debug!(kind = e.kind(), "token verification failed");
        }
        result
    }

    fn verify_pipeline(&self, token: &[u8], now: i64) -> JwtResult<Claims> {
        let token = Token::parse(token)?;
        let header = token.header();
        if header.alg != RS256 {
            return Err(JwtError::unsupported_algorithm(&header.alg));
        }

        let message = token.signing_input().as_bytes();
        let signature = token.signature();

        let kid = match header.kid.as_deref() {
            Some(kid) => {
                let (_, key) = self
                    .verifiers
                    .iter()
                    .find(|(candidate, _)| candidate == kid)
                    .ok_or_else(|| JwtError::unknown_key(kid))?;
                if !verify_rs256(message, signature, key) {
                    return Err(JwtError::SignatureInvalid);
                }
                kid
            }
            None => self
                .verifiers
                .iter()
                .find(|(candidate, key)| {
                    trace!(kid = %candidate, "trying verification key");
                    verify_rs256(message, signature, key)
                })
                .map(|(candidate, _)| candidate.as_str())
                .ok_or(JwtError::SignatureInvalid)?,
        };

        let claims: Claims = serde_json::from_slice(token.payload())
            .map_err(|e| JwtError::MalformedClaims(e.to_string()))?;

        if let Some(exp) = claims.exp {
            if exp <= now {
                return Err(JwtError::TokenExpired);
            }
        }
        if let Some(nbf) = claims.nbf {
            if nbf > now {
                return Err(JwtError::TokenNotYetValid);
            }
        }

        debug!(kid = %kid, "token verified");
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("signing_kid", &self.signing_kid)
            .field("verification_keys", &self.verification_keys)
            .finish_non_exhaustive()
    }
}
