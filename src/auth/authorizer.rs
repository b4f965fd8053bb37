/*!
 * # Authorizer Module
 *
 * One authorizer per resource, selected through an explicit registry —
 * there is no naming-convention dispatch. Every decision takes the
 * authenticated principal and the requested ability; denials carry a
 * human-readable reason that surfaces in the 403 body.
 *
 * Admins bypass permission checks entirely. Record-dependent rules (an
 * order that is no longer pending, a user that still owns records) are
 * domain guards in the service layer, not authorizer concerns.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;
use strum::IntoEnumIterator;

use super::permissions::{format_permission, Ability, Resource};
use super::AuthUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

pub trait Authorizer: Send + Sync {
    fn resource(&self) -> Resource;

    fn decide(&self, user: &AuthUser, ability: Ability) -> Decision;
}

/// Default authorizer: admin bypass, then an exact lookup in the
/// principal's typed permission set.
struct GrantAuthorizer {
    resource: Resource,
}

impl GrantAuthorizer {
    fn new(resource: Resource) -> Self {
        Self { resource }
    }
}

impl Authorizer for GrantAuthorizer {
    fn resource(&self) -> Resource {
        self.resource
    }

    fn decide(&self, user: &AuthUser, ability: Ability) -> Decision {
        if user.is_admin() {
            return Decision::Allow;
        }
        if user.permissions.allows(self.resource, ability) {
            Decision::Allow
        } else {
            Decision::Deny(format!(
                "missing permission {}",
                format_permission(self.resource, ability)
            ))
        }
    }
}

/// Orders carry their own denial wording; operators frequently hit this
/// one and support reads the reason verbatim from the 403.
struct OrdersAuthorizer {
    inner: GrantAuthorizer,
}

impl Authorizer for OrdersAuthorizer {
    fn resource(&self) -> Resource {
        Resource::Orders
    }

    fn decide(&self, user: &AuthUser, ability: Ability) -> Decision {
        match self.inner.decide(user, ability) {
            Decision::Allow => Decision::Allow,
            Decision::Deny(_) => Decision::Deny(format!(
                "not allowed to {} orders; ask a manager for the {} grant",
                ability,
                format_permission(Resource::Orders, ability)
            )),
        }
    }
}

pub struct AuthorizerRegistry {
    authorizers: HashMap<Resource, Box<dyn Authorizer>>,
}

impl AuthorizerRegistry {
    fn new() -> Self {
        let mut authorizers: HashMap<Resource, Box<dyn Authorizer>> = HashMap::new();

        for resource in Resource::iter() {
            authorizers.insert(resource, Box::new(GrantAuthorizer::new(resource)));
        }
        // Explicit overrides
        authorizers.insert(
            Resource::Orders,
            Box::new(OrdersAuthorizer {
                inner: GrantAuthorizer::new(Resource::Orders),
            }),
        );

        Self { authorizers }
    }

    pub fn decide(&self, user: &AuthUser, resource: Resource, ability: Ability) -> Decision {
        match self.authorizers.get(&resource) {
            Some(authorizer) => authorizer.decide(user, ability),
            None => Decision::Deny(format!("no authorizer registered for {}", resource)),
        }
    }
}

lazy_static! {
    pub static ref REGISTRY: AuthorizerRegistry = AuthorizerRegistry::new();
}

/// Decide (principal, resource, ability) through the registry.
pub fn authorize(user: &AuthUser, resource: Resource, ability: Ability) -> Decision {
    REGISTRY.decide(user, resource, ability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::PermissionSet;

    fn user_with(roles: &[&str], perms: &[&str]) -> AuthUser {
        AuthUser {
            user_id: "u-1".to_string(),
            name: Some("Test".to_string()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            permissions: PermissionSet::parse(perms).unwrap(),
        }
    }

    #[test]
    fn admin_bypasses_every_check() {
        let admin = user_with(&["admin"], &[]);
        for resource in Resource::iter() {
            assert!(authorize(&admin, resource, Ability::Delete).is_allow());
        }
    }

    #[test]
    fn non_admin_without_grant_is_denied_regardless_of_target_state() {
        let user = user_with(&["operator"], &["orders:read"]);
        let decision = authorize(&user, Resource::Orders, Ability::Delete);
        assert!(!decision.is_allow());
        assert!(decision.reason().unwrap().contains("orders:delete"));
    }

    #[test]
    fn exact_grant_is_honored() {
        let user = user_with(&["operator"], &["orders:delete"]);
        assert!(authorize(&user, Resource::Orders, Ability::Delete).is_allow());
    }

    #[test]
    fn every_resource_has_a_registered_authorizer() {
        let user = user_with(&[], &["*"]);
        for resource in Resource::iter() {
            assert!(REGISTRY.decide(&user, resource, Ability::Read).is_allow());
        }
    }
}
