//! RS256 primitives and compact-serialization encoding helpers.

pub(crate) mod encoding;
pub(crate) mod rs256;

pub(crate) use encoding::{base64_url_decode, base64_url_encode};
pub use rs256::RS256;
