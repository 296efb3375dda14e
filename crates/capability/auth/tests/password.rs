use pms_auth::{PasswordVerdict, hash_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("admin123").expect("hash");
    assert_eq!(
        verify_password(&hash, "admin123").expect("check"),
        PasswordVerdict::Matched
    );
    assert_eq!(
        verify_password(&hash, "nope").expect("check"),
        PasswordVerdict::Rejected
    );
}

#[test]
fn legacy_plaintext_upgrades() {
    match verify_password("admin123", "admin123").expect("check") {
        PasswordVerdict::MatchedLegacy { upgrade_hash } => {
            assert!(upgrade_hash.starts_with("$argon2"));
        }
        other => panic!("unexpected verdict: {other:?}"),
    }
}

#[test]
fn wrong_password_rejected() {
    assert_eq!(
        verify_password("admin123", "bad").expect("check"),
        PasswordVerdict::Rejected
    );
}
