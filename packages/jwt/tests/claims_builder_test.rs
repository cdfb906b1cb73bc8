//! Claims builder and claim-set serialization.

use chrono::{Duration, TimeZone, Utc};
use jwt_codec::claims::*;
use serde_json::json;

#[test]
fn test_claims_builder_requires_only_subject() {
    // build() is only available once a subject is set
    let claims = ClaimsBuilder::new().subject("test-user").build();

    assert_eq!(claims.sub, "test-user");
    assert!(claims.iat.is_none());
    assert!(claims.exp.is_none());
    assert!(claims.iss.is_none());
    assert!(claims.aud.is_none());
    assert!(claims.nbf.is_none());
    assert!(claims.jti.is_none());
    assert!(claims.extra.is_empty());
}

#[test]
fn test_claims_builder_with_optional_fields() {
    let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let claims = ClaimsBuilder::new()
        .issued_at(issued)
        .expires_at(issued + Duration::hours(2))
        .subject("test-user")
        .issuer("test-issuer")
        .audience(vec!["api".to_string(), "web".to_string()])
        .not_before(issued)
        .jwt_id("unique-id-123")
        .build();

    assert_eq!(claims.subject(), "test-user");
    assert_eq!(claims.iat, Some(1_704_067_200));
    assert_eq!(claims.exp, Some(1_704_067_200 + 7200));
    assert_eq!(claims.issued_at(), Some(issued));
    assert_eq!(claims.expires_at(), Some(issued + Duration::hours(2)));
    assert_eq!(claims.iss, Some("test-issuer".to_string()));
    assert_eq!(claims.aud, Some(vec!["api".to_string(), "web".to_string()]));
    assert_eq!(claims.nbf, Some(1_704_067_200));
    assert_eq!(claims.jti, Some("unique-id-123".to_string()));
}

#[test]
fn test_relative_expiry() {
    let claims = ClaimsBuilder::new()
        .subject("short-lived")
        .issued_now()
        .expires_in(Duration::seconds(30))
        .build();

    let (iat, exp) = (claims.iat.unwrap(), claims.exp.unwrap());
    assert!(exp > iat);
    assert!(exp - iat <= 31);
}

#[test]
fn test_claims_serialization_is_compact() {
    let mut claims = Claims::new("serialization-test");
    claims.iat = Some(1_700_000_000);

    let json = serde_json::to_string(&claims).unwrap();
    assert_eq!(json, r#"{"sub":"serialization-test","iat":1700000000}"#);

    let decoded: Claims = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, claims);
}

#[test]
fn test_claims_with_custom_data() {
    let claims = ClaimsBuilder::new()
        .subject("custom-data-test")
        .custom("role", json!("admin"))
        .custom("permissions", json!(["read", "write", "delete"]))
        .build();

    assert_eq!(claims.claim("role"), Some(&json!("admin")));
    assert_eq!(
        claims.claim("permissions"),
        Some(&json!(["read", "write", "delete"]))
    );

    // Custom claims sit next to registered ones in the payload.
    let value = serde_json::to_value(&claims).unwrap();
    assert_eq!(value["role"], "admin");
    assert_eq!(value["sub"], "custom-data-test");
}

#[test]
fn test_unknown_claims_are_kept() {
    let claims: Claims =
        serde_json::from_str(r#"{"sub":"s","tenant":"acme","exp":10,"aud":"api"}"#).unwrap();
    assert_eq!(claims.exp, Some(10));
    assert_eq!(claims.aud, Some(vec!["api".to_string()]));
    assert_eq!(claims.claim("tenant"), Some(&json!("acme")));
    assert!(claims.claim("exp").is_none());
}

#[test]
fn test_subject_is_required_when_decoding() {
    assert!(serde_json::from_str::<Claims>(r#"{"iat":1}"#).is_err());
}

#[test]
fn test_fractional_numeric_dates_are_truncated() {
    let claims: Claims = serde_json::from_str(
        r#"{"sub":"s","iat":1700000000.75,"exp":1700003600.2,"nbf":1699999999.9}"#,
    )
    .unwrap();
    assert_eq!(claims.iat, Some(1_700_000_000));
    assert_eq!(claims.exp, Some(1_700_003_600));
    assert_eq!(claims.nbf, Some(1_699_999_999));
    assert!(claims.extra.is_empty());

    // Re-encoded as whole seconds.
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json["exp"], json!(1_700_003_600));
}

#[test]
fn test_non_numeric_dates_are_rejected() {
    assert!(serde_json::from_str::<Claims>(r#"{"sub":"s","exp":"soon"}"#).is_err());
    assert!(serde_json::from_str::<Claims>(r#"{"sub":"s","exp":1e300}"#).is_err());
}
