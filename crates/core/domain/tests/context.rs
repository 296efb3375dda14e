use domain::{PaymentFrequency, TenantContext, UnitStatus, Utilities, permissions};

#[test]
fn tenant_context_builds() {
    let ctx = TenantContext::new(
        "tenant-1",
        "user-1",
        vec!["landlord".to_string()],
        vec!["PROPERTY.READ".to_string()],
        None,
    );

    assert_eq!(ctx.tenant_id, "tenant-1");
    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.roles.len(), 1);
    assert_eq!(ctx.permissions.len(), 1);
    assert!(ctx.property_scope.is_none());
}

#[test]
fn admin_role_grants_every_permission() {
    let ctx = TenantContext::new(
        "tenant-1",
        "user-1",
        vec![permissions::ROLE_ADMIN.to_string()],
        vec![],
        None,
    );
    assert!(ctx.has_permission(permissions::LAYOUT_WRITE));

    let landlord = TenantContext::new(
        "tenant-1",
        "user-2",
        vec![permissions::ROLE_LANDLORD.to_string()],
        vec![permissions::PROPERTY_READ.to_string()],
        None,
    );
    assert!(landlord.has_permission(permissions::PROPERTY_READ));
    assert!(!landlord.has_permission(permissions::LAYOUT_WRITE));
}

#[test]
fn scoped_context_keeps_identity() {
    let ctx = TenantContext::new("tenant-1", "user-1", vec![], vec![], None);
    let scoped = ctx.scoped_to("property-1");
    assert_eq!(scoped.property_scope.as_deref(), Some("property-1"));
    assert_eq!(scoped.user_id, "user-1");
}

#[test]
fn enums_parse_snake_case() {
    assert_eq!("maintenance".parse::<UnitStatus>(), Ok(UnitStatus::Maintenance));
    assert_eq!(
        " Semi_Annually ".parse::<PaymentFrequency>(),
        Ok(PaymentFrequency::SemiAnnually)
    );
    let err = "sold".parse::<UnitStatus>().expect_err("unknown");
    assert_eq!(err.to_string(), "unknown status: sold");
    assert_eq!(UnitStatus::default().as_str(), "vacant");
}

#[test]
fn utilities_list_enabled_in_fixed_order() {
    let utilities = Utilities {
        electricity: true,
        water: false,
        wifi: true,
    };
    assert_eq!(utilities.enabled(), vec!["electricity", "wifi"]);
}
