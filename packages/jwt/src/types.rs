//! JWS header and the decoded three-part token structure

use crate::algorithms::{RS256, base64_url_decode};
use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JWT header structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm
    pub alg: String,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Header {
    /// RS256 header naming the signing key.
    #[must_use]
    pub fn rs256(kid: impl Into<String>) -> Self {
        Self {
            alg: RS256.to_string(),
            typ: Some("JWT".to_string()),
            kid: Some(kid.into()),
        }
    }
}

/// A compact token split into its segments, with the header decoded.
///
/// Parsing checks shape only; nothing here has been verified.
pub struct Token<'a> {
    header: Header,
    signing_input: &'a str,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl<'a> Token<'a> {
    /// Split `token` into exactly three base64url segments and decode the header.
    ///
    /// # Errors
    /// Returns [`JwtError::MalformedToken`] if the input is not UTF-8, does not
    /// have three segments, a segment is not unpadded base64url, or the header
    /// is not a JSON header object.
    pub fn parse(token: &'a [u8]) -> JwtResult<Self> {
        let token = std::str::from_utf8(token)
            .map_err(|_| JwtError::malformed_token("token is not valid UTF-8"))?;

        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = parts.as_slice() else {
            return Err(JwtError::MalformedToken(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        };

        let header_bytes = decode_segment(header_b64, "header")?;
        let payload = decode_segment(payload_b64, "payload")?;
        let signature = decode_segment(signature_b64, "signature")?;

        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|e| JwtError::MalformedToken(format!("invalid header: {e}")))?;

        // header.payload, exactly as received
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];

        Ok(Self {
            header,
            signing_input,
            payload,
            signature,
        })
    }

    /// Decoded header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The `header.payload` bytes the signature covers.
    #[must_use]
    pub fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    /// Decoded payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decoded signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// Payload and signature are redacted.
impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header)
            .field("payload", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

fn decode_segment(encoded: &str, segment: &str) -> JwtResult<Vec<u8>> {
    base64_url_decode(encoded)
        .map_err(|e| JwtError::MalformedToken(format!("{segment} is not base64url: {e}")))
}
