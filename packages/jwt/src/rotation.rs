//! Zero-downtime replacement of the active codec.
//!
//! Rotating keys means building a new [`TokenCodec`] (new signing key, an
//! updated verification key set) and swapping it in. The swap is a lock-free
//! atomic pointer store, so requests already holding the previous codec
//! finish with it while new requests see the replacement.

use crate::{claims::Claims, codec::TokenCodec, error::JwtResult};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Shared handle to the currently active [`TokenCodec`].
#[derive(Debug)]
pub struct CodecRotator {
    active: ArcSwap<TokenCodec>,
}

impl CodecRotator {
    /// Create a rotator with an initial codec.
    #[must_use]
    pub fn new(initial: TokenCodec) -> Self {
        Self {
            active: ArcSwap::from_pointee(initial),
        }
    }

    /// Get the current active codec.
    #[must_use]
    pub fn current(&self) -> Arc<TokenCodec> {
        self.active.load_full()
    }

    /// Install `next` as the active codec and return the one it replaced.
    pub fn rotate(&self, next: TokenCodec) -> Arc<TokenCodec> {
        let next = Arc::new(next);
        let previous = self.active.swap(Arc::clone(&next));
        info!(
            previous_kid = %previous.signing_kid(),
            kid = %next.signing_kid(),
            "rotated token codec"
        );
        previous
    }

    /// Sign with whichever codec is active.
    ///
    /// # Errors
    /// See [`TokenCodec::sign`].
    pub fn sign(&self, claims: &Claims) -> JwtResult<Vec<u8>> {
        self.active.load().sign(claims)
    }

    /// Verify with whichever codec is active.
    ///
    /// # Errors
    /// See [`TokenCodec::verify`].
    pub fn verify(&self, token: &[u8]) -> JwtResult<Claims> {
        self.active.load().verify(token)
    }
}

impl From<TokenCodec> for CodecRotator {
    fn from(codec: TokenCodec) -> Self {
        Self::new(codec)
    }
}
