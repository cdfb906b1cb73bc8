//! Concrete Future types for offloading RSA work from async contexts.
//!
//! RSA signing is CPU-bound, so these run on tokio's blocking pool rather
//! than on the caller's executor thread.

use crate::{
    claims::Claims,
    codec::TokenCodec,
    error::{JwtError, JwtResult},
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::task::{JoinError, JoinHandle};

/// Future for token signing operations.
#[derive(Debug)]
pub struct SignFuture {
    handle: JoinHandle<JwtResult<Vec<u8>>>,
}

/// Future for token verification operations.
#[derive(Debug)]
pub struct VerifyFuture {
    handle: JoinHandle<JwtResult<Claims>>,
}

impl Future for SignFuture {
    type Output = JwtResult<Vec<u8>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(flatten)
    }
}

impl Future for VerifyFuture {
    type Output = JwtResult<Claims>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(flatten)
    }
}

fn flatten<T>(joined: Result<JwtResult<T>, JoinError>) -> JwtResult<T> {
    joined.unwrap_or_else(|e| Err(JwtError::TaskFailed(e.to_string())))
}

impl TokenCodec {
    /// Sign on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn sign_async(self: &Arc<Self>, claims: Claims) -> SignFuture {
        let codec = Arc::clone(self);
        SignFuture {
            handle: tokio::task::spawn_blocking(move || codec.sign(&claims)),
        }
    }

    /// Verify on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn verify_async(self: &Arc<Self>, token: impl Into<Vec<u8>>) -> VerifyFuture {
        let codec = Arc::clone(self);
        let token = token.into();
        VerifyFuture {
            handle: tokio::task::spawn_blocking(move || codec.verify(&token)),
        }
    }
}
