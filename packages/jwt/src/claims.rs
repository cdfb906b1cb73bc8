//! JWT claims and builder with compile-time subject checking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use std::{collections::BTreeMap, marker::PhantomData};

/// Registered claim names that live in dedicated fields and may not appear in
/// [`Claims::extra`].
pub const REGISTERED_CLAIMS: [&str; 7] = ["sub", "iat", "exp", "nbf", "iss", "aud", "jti"];

/// Typestate markers for builder pattern.
pub mod ts {
    /// Marker for a field that has been set.
    pub struct Set;
    /// Marker for a field that has not been set.
    pub struct Unset;
}

/// JWT claim set.
///
/// Fractional `iat`/`exp`/`nbf` values are accepted when decoding and
/// truncated to whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject.
    pub sub: String,
    /// Issued-at (unix seconds). Filled in at signing time when absent.
    #[serde(default, deserialize_with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (unix seconds).
    #[serde(default, deserialize_with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds).
    #[serde(default, deserialize_with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience. A single string is accepted when decoding.
    #[serde(default, deserialize_with = "audience", skip_serializing_if = "Option::is_none")]
    pub aud: Option<Vec<String>>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Any other claims, flattened into the payload object.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Claims {
    /// Claims carrying only a subject.
    #[must_use]
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            iat: None,
            exp: None,
            nbf: None,
            iss: None,
            aud: None,
            jti: None,
            extra: BTreeMap::new(),
        }
    }

    /// Subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Issued-at as a timestamp.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Look up a non-registered claim.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// RFC 7519 NumericDate: whole or fractional seconds, truncated toward zero.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericDate {
        Whole(i64),
        Fractional(f64),
    }

    match Option::<NumericDate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumericDate::Whole(secs)) => Ok(Some(secs)),
        Some(NumericDate::Fractional(secs))
            if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 =>
        {
            Ok(Some(secs.trunc() as i64))
        }
        Some(NumericDate::Fractional(secs)) => Err(D::Error::custom(format!(
            "NumericDate {secs} is out of range"
        ))),
    }
}

fn audience<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(aud)) => Some(vec![aud]),
        Some(OneOrMany::Many(aud)) => Some(aud),
        None => None,
    })
}

/// Compile-time checked builder for JWT claims: `build` needs a subject.
pub struct ClaimsBuilder<Sub = ts::Unset> {
    claims: Claims,
    _phantom: PhantomData<Sub>,
}

impl ClaimsBuilder {
    /// Create a new claims builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            claims: Claims::new(String::new()),
            _phantom: PhantomData,
        }
    }
}

impl Default for ClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsBuilder<ts::Unset> {
    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> ClaimsBuilder<ts::Set> {
        self.claims.sub = sub.into();
        ClaimsBuilder {
            claims: self.claims,
            _phantom: PhantomData,
        }
    }
}

impl<Sub> ClaimsBuilder<Sub> {
    /// Set the expiry (exp) claim.
    #[must_use]
    pub fn expires_at(mut self, exp: DateTime<Utc>) -> Self {
        self.claims.exp = Some(exp.timestamp());
        self
    }

    /// Set the expiry relative to now.
    #[must_use]
    pub fn expires_in(self, ttl: Duration) -> Self {
        self.expires_at(Utc::now() + ttl)
    }

    /// Set the issued-at (iat) claim.
    #[must_use]
    pub fn issued_at(mut self, iat: DateTime<Utc>) -> Self {
        self.claims.iat = Some(iat.timestamp());
        self
    }

    /// Set issued-at to now.
    #[must_use]
    pub fn issued_now(self) -> Self {
        self.issued_at(Utc::now())
    }

    /// Set the not-before (nbf) claim.
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.claims.nbf = Some(nbf.timestamp());
        self
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.iss = Some(iss.into());
        self
    }

    /// Set the audience (aud) claim.
    #[must_use]
    pub fn audience(mut self, aud: Vec<String>) -> Self {
        self.claims.aud = Some(aud);
        self
    }

    /// Set the JWT ID (jti) claim.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.claims.jti = Some(jti.into());
        self
    }

    /// Add a custom claim. Registered names are rejected later, at signing.
    #[must_use]
    pub fn custom(mut self, name: impl Into<String>, value: Value) -> Self {
        self.claims.extra.insert(name.into(), value);
        self
    }
}

impl ClaimsBuilder<ts::Set> {
    /// Build the claims.
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }
}
