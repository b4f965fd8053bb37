//! Authorizer registry behavior: typed grants, admin bypass, and denial
//! reasons.

use moldline_api::auth::{
    authorize, Ability, AuthUser, PermissionParseError, PermissionSet, Resource,
};
use strum::IntoEnumIterator;

fn user(roles: &[&str], perms: &[&str]) -> AuthUser {
    AuthUser {
        user_id: "7e5c7a2e-54a5-41c6-a2f0-f7ad0cb04b11".to_string(),
        name: Some("Test User".to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        permissions: PermissionSet::parse(perms).unwrap(),
    }
}

#[test]
fn non_admin_without_delete_grant_is_denied_on_orders() {
    // Holding every other orders ability changes nothing: delete is decided
    // on its own, regardless of any order's state.
    let operator = user(
        &["operator"],
        &["orders:read", "orders:create", "orders:update"],
    );
    let decision = authorize(&operator, Resource::Orders, Ability::Delete);
    assert!(!decision.is_allow());
    let reason = decision.reason().expect("denial carries a reason");
    assert!(reason.contains("orders:delete"));
}

#[test]
fn admin_role_bypasses_all_checks() {
    let admin = user(&["admin"], &[]);
    for resource in Resource::iter() {
        for ability in Ability::iter() {
            assert!(
                authorize(&admin, resource, ability).is_allow(),
                "admin denied on {resource}:{ability}"
            );
        }
    }
}

#[test]
fn resource_wildcard_grants_every_ability_on_that_resource_only() {
    let stock_clerk = user(&["operator"], &["movements:*", "reservations:read"]);
    assert!(authorize(&stock_clerk, Resource::Movements, Ability::Create).is_allow());
    assert!(authorize(&stock_clerk, Resource::Reservations, Ability::Read).is_allow());
    assert!(!authorize(&stock_clerk, Resource::Reservations, Ability::Update).is_allow());
    assert!(!authorize(&stock_clerk, Resource::Orders, Ability::Read).is_allow());
}

#[test]
fn unknown_permission_strings_fail_parsing() {
    assert!(matches!(
        PermissionSet::parse(&["warranties:read"]).unwrap_err(),
        PermissionParseError::UnknownResource(_)
    ));
    assert!(matches!(
        PermissionSet::parse(&["orders:approve"]).unwrap_err(),
        PermissionParseError::UnknownAbility(_)
    ));
    assert!(matches!(
        PermissionSet::parse(&["orders"]).unwrap_err(),
        PermissionParseError::Malformed(_)
    ));
}

#[test]
fn can_helper_matches_registry_decisions() {
    let manager = user(&["manager"], &["orders:*"]);
    assert!(manager.can(Resource::Orders, Ability::Delete));
    assert!(!manager.can(Resource::Users, Ability::Delete));
}
