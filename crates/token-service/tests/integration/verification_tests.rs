//! Tamper, key and expiry checks on issued tokens.

use base64::{engine::general_purpose::STANDARD, Engine};
use common::rtc_token::{
    encode_token, split_token, TokenValidationError, SIGNATURE_HEX_LEN,
};
use common::secret::SecretString;
use common::types::{Privilege, Role};
use token_service::services::TokenVerifier;
use token_test_utils::*;

fn issue_publisher() -> String {
    test_issuer(test_clock())
        .issue_with_uid_and_role(TEST_CHANNEL, TEST_UID, Role::Publisher, 3600, 3600)
        .expect("issue should succeed")
}

#[test]
fn test_round_trip_recovers_issued_fields() {
    let token = issue_publisher();
    let content = test_verifier(test_clock())
        .verify(&token, TEST_CHANNEL, "1001", Some(Privilege::JoinChannel))
        .expect("token should verify");

    assert_eq!(content.issuer, TEST_APP_ID);
    assert_eq!(content.expires_at, TEST_NOW + 3600);
    assert_eq!(content.role, Some(Role::Publisher));
    assert_eq!(content.privileges.len(), 4);
}

#[test]
fn test_any_flipped_payload_bit_is_rejected() {
    let token = issue_publisher();
    let blob = STANDARD.decode(&token).expect("decode");
    let verifier = test_verifier(test_clock());

    for index in SIGNATURE_HEX_LEN..blob.len() {
        for bit in 0..8 {
            let mut tampered = blob.clone();
            tampered[index] ^= 1 << bit;
            assert_eq!(
                verifier.verify(&STANDARD.encode(&tampered), TEST_CHANNEL, "1001", None),
                Err(TokenValidationError::SignatureMismatch),
                "byte {index} bit {bit}"
            );
        }
    }
}

#[test]
fn test_uppercase_signature_is_rejected() {
    let token = issue_publisher();
    let parts = split_token(&token).expect("split");
    let uppercase = encode_token(&parts.signature_hex.to_uppercase(), &parts.payload);

    assert_eq!(
        test_verifier(test_clock()).verify(&uppercase, TEST_CHANNEL, "1001", None),
        Err(TokenValidationError::MalformedToken)
    );
}

#[test]
fn test_wrong_certificate_is_rejected() {
    let token = issue_publisher();
    let verifier =
        TokenVerifier::with_clock(TEST_APP_ID, SecretString::from("not-secret"), test_clock())
            .expect("verifier");

    assert_eq!(
        verifier.verify(&token, TEST_CHANNEL, "1001", None),
        Err(TokenValidationError::SignatureMismatch)
    );
}

#[test]
fn test_negative_lifetime_is_expired_at_issue() {
    let clock = test_clock();
    let token = test_issuer(clock.clone())
        .issue_with_uid_and_role(TEST_CHANNEL, TEST_UID, Role::Publisher, -10, -10)
        .expect("negative lifetimes are accepted");

    token.assert_expires_at(TEST_NOW - 10);
    assert_eq!(
        test_verifier(clock).verify(&token, TEST_CHANNEL, "1001", None),
        Err(TokenValidationError::Expired)
    );
}

#[test]
fn test_token_expires_after_lifetime() {
    let clock = test_clock();
    let token = issue_publisher();
    let verifier = test_verifier(clock.clone());

    assert!(verifier.verify(&token, TEST_CHANNEL, "1001", None).is_ok());

    clock.advance(3600);
    assert_eq!(
        verifier.verify(&token, TEST_CHANNEL, "1001", None),
        Err(TokenValidationError::Expired)
    );
}

#[test]
fn test_wrong_scope_is_rejected() {
    let token = issue_publisher();
    let verifier = test_verifier(test_clock());

    assert_eq!(
        verifier.verify(&token, "room43", "1001", None),
        Err(TokenValidationError::ChannelMismatch)
    );
    assert_eq!(
        verifier.verify(&token, TEST_CHANNEL, "1002", None),
        Err(TokenValidationError::SubjectMismatch)
    );
}

#[test]
fn test_signature_prefix_is_hex_of_payload_hmac() {
    let token = issue_publisher();
    let parts = split_token(&token).expect("split");
    let expected =
        token_service::crypto::sign_payload(&parts.payload, TEST_APP_CERTIFICATE.as_bytes())
            .expect("sign");
    assert_eq!(parts.signature_hex, expected);
}
