//! Token codec error types

/// Token codec result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors reported by key construction, signing and verification.
///
/// Every variant is terminal: the codec never retries and never returns
/// partially verified claims.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    /// Key material is structurally invalid or unsuitable for its role
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// Claims rejected before signing
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
    /// RSA signing failed
    #[error("Signing error: {0}")]
    SigningError(String),
    /// Token is not three valid base64url segments with a JSON header
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// Header names an algorithm other than RS256
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Header `kid` does not match any verification key
    #[error("Unknown key id: {0}")]
    UnknownKey(String),
    /// No verification key accepts the signature
    #[error("Invalid token signature")]
    SignatureInvalid,
    /// Signature is valid but the payload is not a claim set
    #[error("Malformed claims: {0}")]
    MalformedClaims(String),
    /// `exp` is at or before the current time
    #[error("Token has expired")]
    TokenExpired,
    /// `nbf` is after the current time
    #[error("Token not yet valid")]
    TokenNotYetValid,
    /// JSON serialization of header or claims failed
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Key configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
    /// Background task failed
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl JwtError {
    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: &str) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing_error(msg: &str) -> Self {
        JwtError::SigningError(msg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create an unknown key error
    #[inline]
    #[must_use]
    pub fn unknown_key(kid: &str) -> Self {
        JwtError::UnknownKey(kid.to_string())
    }

    /// Create a malformed claims error
    #[inline]
    #[must_use]
    pub fn malformed_claims(msg: &str) -> Self {
        JwtError::MalformedClaims(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }

    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn config(msg: &str) -> Self {
        JwtError::Config(msg.to_string())
    }

    /// Short, stable name of the error kind for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::InvalidKey(_) => "invalid_key",
            JwtError::InvalidClaims(_) => "invalid_claims",
            JwtError::SigningError(_) => "signing_error",
            JwtError::MalformedToken(_) => "malformed_token",
            JwtError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            JwtError::UnknownKey(_) => "unknown_key",
            JwtError::SignatureInvalid => "signature_invalid",
            JwtError::MalformedClaims(_) => "malformed_claims",
            JwtError::TokenExpired => "token_expired",
            JwtError::TokenNotYetValid => "token_not_yet_valid",
            JwtError::Serialization(_) => "serialization",
            JwtError::Config(_) => "config",
            JwtError::TaskFailed(_) => "task_failed",
        }
    }
}
