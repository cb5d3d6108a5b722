//! Issuance properties checked through the public library API.

use base64::{engine::general_purpose::STANDARD, Engine};
use common::rtc_token::split_token;
use common::types::{Privilege, Role};
use token_service::services::PrivilegeExpireSeconds;
use token_test_utils::*;

#[test]
fn test_publisher_token_scenario() {
    let issuer = test_issuer(test_clock());

    let token = issuer
        .issue_with_uid_and_role(TEST_CHANNEL, TEST_UID, Role::Publisher, 3600, 3600)
        .expect("issue should succeed");

    token
        .assert_well_formed()
        .assert_signed_with(TEST_APP_CERTIFICATE)
        .assert_issued_by(TEST_APP_ID)
        .assert_for_channel(TEST_CHANNEL)
        .assert_for_subject("1001")
        .assert_role(Role::Publisher)
        .assert_expires_at(TEST_NOW + 3600);

    for privilege in Privilege::ALL {
        token.assert_privilege_expires_at(privilege, TEST_NOW + 3600);
    }
}

#[test]
fn test_decoded_blob_is_signature_then_json() {
    let issuer = test_issuer(test_clock());
    let token = issuer
        .issue_with_uid_and_role(TEST_CHANNEL, TEST_UID, Role::Publisher, 3600, 3600)
        .expect("issue should succeed");

    let blob = STANDARD.decode(&token).expect("token is standard base64");
    let text = String::from_utf8(blob).expect("blob is ASCII");
    let (signature, payload) = text.split_at(64);

    assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        payload,
        format!(
            r#"{{"iss":"app1","exp":{exp},"v":1,"channel":"room42","uid":"1001","role":1,"privileges":{{"1":{exp},"2":{exp},"3":{exp},"4":{exp}}}}}"#,
            exp = TEST_NOW + 3600
        )
    );
}

#[test]
fn test_explicit_privileges_scenario() {
    let issuer = test_issuer(test_clock());

    let token = issuer
        .issue_with_explicit_privileges(
            TEST_CHANNEL,
            TEST_UID,
            3600,
            PrivilegeExpireSeconds {
                join_channel: 3600,
                publish_audio: 60,
                publish_video: 60,
                publish_data_stream: 0,
            },
        )
        .expect("issue should succeed");

    token
        .assert_well_formed()
        .assert_signed_with(TEST_APP_CERTIFICATE)
        .assert_has_no_role()
        .assert_privilege_expires_at(Privilege::JoinChannel, TEST_NOW + 3600)
        .assert_privilege_expires_at(Privilege::PublishAudio, TEST_NOW + 60)
        .assert_privilege_expires_at(Privilege::PublishVideo, TEST_NOW + 60)
        .assert_privilege_expires_at(Privilege::PublishDataStream, TEST_NOW);
}

#[test]
fn test_same_inputs_same_second_are_identical() {
    let clock = test_clock();
    let issuer = test_issuer(clock);

    let first = issuer
        .issue_with_uid(TEST_CHANNEL, TEST_UID, Role::Subscriber, 600, 600)
        .expect("issue should succeed");
    let second = issuer
        .issue_with_uid(TEST_CHANNEL, TEST_UID, Role::Subscriber, 600, 600)
        .expect("issue should succeed");

    assert_eq!(first, second);
}

#[test]
fn test_later_second_changes_only_timestamps() {
    let clock = test_clock();
    let issuer = test_issuer(clock.clone());

    let first = issuer
        .issue_with_uid(TEST_CHANNEL, TEST_UID, Role::Publisher, 3600, 3600)
        .expect("issue should succeed");
    clock.advance(1);
    let second = issuer
        .issue_with_uid(TEST_CHANNEL, TEST_UID, Role::Publisher, 3600, 3600)
        .expect("issue should succeed");

    assert_ne!(first, second);

    let a = decode_content(&first);
    let b = decode_content(&second);
    assert_eq!(b.expires_at, a.expires_at + 1);
    assert_eq!(a.channel, b.channel);
    assert_eq!(a.subject, b.subject);
    assert_eq!(a.role, b.role);

    let sig_a = split_token(&first).expect("split").signature_hex;
    let sig_b = split_token(&second).expect("split").signature_hex;
    assert_ne!(sig_a, sig_b);
}

#[test]
fn test_role_does_not_narrow_privileges() {
    let issuer = test_issuer(test_clock());

    let token = issuer
        .issue_with_uid_and_role(TEST_CHANNEL, TEST_UID, Role::Subscriber, 3600, 1800)
        .expect("issue should succeed");

    token.assert_role(Role::Subscriber);
    for privilege in Privilege::ALL {
        token.assert_privilege_expires_at(privilege, TEST_NOW + 1800);
    }
}
