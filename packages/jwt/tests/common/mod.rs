//! Shared key fixtures for integration tests.
#![allow(dead_code)]

use jwt_codec::config::{decode_private_key, decode_public_key};
use jwt_codec::{KeyMaterial, TokenCodec};

pub const SUBJECT: &str = "c21ae0e1-39ad-494f-badd-2d54e072641e";

/// RFC 7638 thumbprints of the fixture keys, computed independently.
pub const SIGNING_KEY_1_KID: &str = "xJZ6_fIUkefLF-3O0aC-ODYolsvugmh15Tvg-NJ7Jck";
pub const SIGNING_KEY_2_KID: &str = "Er-Sc__GuxDraG3vGPA-HHNh-L6PJkvRT-aHfh5eNi4";
pub const OUTSIDER_KEY_KID: &str = "jmQ7SVLJ42tdx6nmzW0hg5qWFXv6MK8igbiBS_-H914";

pub const SIGNING_KEY_1_PKCS8: &str = include_str!("../fixtures/signing_key_1.pk8.b64");
pub const SIGNING_KEY_1_SPKI: &str = include_str!("../fixtures/signing_key_1.spki.b64");
pub const SIGNING_KEY_2_PKCS8: &str = include_str!("../fixtures/signing_key_2.pk8.b64");
pub const OUTSIDER_KEY_PKCS8: &str = include_str!("../fixtures/outsider_key.pk8.b64");
pub const WEAK_KEY_PKCS8: &str = include_str!("../fixtures/weak_1024.pk8.b64");

/// 4096-bit key pair.
pub fn signing_key_1() -> KeyMaterial {
    decode_private_key(SIGNING_KEY_1_PKCS8).expect("fixture key 1 should load")
}

/// Second 4096-bit key pair.
pub fn signing_key_2() -> KeyMaterial {
    decode_private_key(SIGNING_KEY_2_PKCS8).expect("fixture key 2 should load")
}

/// 2048-bit key pair that no codec under test trusts.
pub fn outsider_key() -> KeyMaterial {
    decode_private_key(OUTSIDER_KEY_PKCS8).expect("outsider key should load")
}

/// Public half of key 1, loaded from SPKI.
pub fn signing_key_1_public() -> KeyMaterial {
    decode_public_key(SIGNING_KEY_1_SPKI).expect("fixture public key should load")
}

/// Both fixture key pairs, as the rotation tests expect them.
pub fn verification_keys() -> Vec<KeyMaterial> {
    vec![signing_key_1(), signing_key_2()]
}

/// Codec signing with key 1 and trusting keys 1 and 2.
pub fn codec() -> TokenCodec {
    TokenCodec::new(signing_key_1(), verification_keys()).expect("codec should build")
}

/// Split a compact token into its three text segments.
pub fn segments(token: &[u8]) -> [String; 3] {
    let text = std::str::from_utf8(token).expect("token is ASCII");
    let parts: Vec<String> = text.split('.').map(str::to_string).collect();
    parts.try_into().expect("three segments")
}
