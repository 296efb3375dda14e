use domain::TenantContext;
use pms_auth::{AuthError, JwtManager};

fn landlord() -> TenantContext {
    TenantContext::new(
        "tenant-1",
        "user-1",
        vec!["landlord".to_string()],
        vec!["LAYOUT.WRITE".to_string()],
        None,
    )
}

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret", 3600);
    let token = jwt.issue_access(&landlord()).expect("token");
    let ctx = jwt.decode_access(&token.token).expect("access");
    assert_eq!(ctx.tenant_id, "tenant-1");
    assert_eq!(ctx.user_id, "user-1");
    assert!(ctx.has_permission("LAYOUT.WRITE"));
    assert!(ctx.property_scope.is_none());
}

#[test]
fn property_scope_survives_round_trip() {
    let jwt = JwtManager::new("secret", 3600);
    let token = jwt
        .issue_access(&landlord().scoped_to("property-7"))
        .expect("token");
    let ctx = jwt.decode_access(&token.token).expect("access");
    assert_eq!(ctx.property_scope.as_deref(), Some("property-7"));
}

#[test]
fn foreign_secret_is_rejected() {
    let issued = JwtManager::new("secret", 3600)
        .issue_access(&landlord())
        .expect("token");
    let result = JwtManager::new("other", 3600).decode_access(&issued.token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
    assert!(matches!(
        JwtManager::new("secret", 3600).decode_access("not-a-token"),
        Err(AuthError::TokenInvalid)
    ));
}
