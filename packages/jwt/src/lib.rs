//! RS256 JSON Web Tokens with verification-key rotation.
//!
//! This crate provides:
//! - [`TokenCodec`]: sign claims with one RSA private key, verify against an
//!   ordered set of public keys
//! - [`KeyMaterial`] and [`VerificationKeySet`] with RFC 7638 key identifiers
//!   and JWKS export
//! - [`CodecRotator`] for swapping the active codec without downtime
//! - [`KeyConfig`] for building a codec from base64url-encoded keys
//!
//! ```no_run
//! use jwt_codec::{Claims, KeyMaterial, TokenCodec};
//!
//! # fn run(pkcs8_der: &[u8]) -> jwt_codec::JwtResult<()> {
//! let key = KeyMaterial::from_pkcs8_der(pkcs8_der)?;
//! let codec = TokenCodec::new(key.clone(), [key])?;
//!
//! let token = codec.sign(&Claims::new("user-42"))?;
//! let claims = codec.verify(&token)?;
//! assert_eq!(claims.subject(), "user-42");
//! # Ok(())
//! # }
//! ```

pub(crate) mod algorithms;
pub mod claims;
mod codec;
pub mod config;
mod error;
mod futures;
pub mod keys;
mod rotation;
mod types;

pub use algorithms::RS256;
pub use claims::{Claims, ClaimsBuilder};
pub use codec::TokenCodec;
pub use config::KeyConfig;
pub use error::*;
pub use futures::{SignFuture, VerifyFuture};
pub use keys::{Jwks, KeyMaterial, PublicJwk, VerificationKeySet};
pub use rotation::CodecRotator;
pub use types::*;
