/*!
 * # Permissions Module
 *
 * Permissions are a strongly-typed mapping from resource to ability.
 * Token claims carry `"resource:ability"` strings; they are parsed into a
 * [`PermissionSet`] when the token is validated, and unknown resource or
 * ability names are rejected at that boundary instead of being carried
 * around as opaque strings.
 */

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Every protected resource exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    RawMaterials,
    ProductionPointings,
    Reservations,
    Movements,
    BlockProductions,
    MoldedProductions,
    Machines,
    Orders,
    Products,
    Clients,
    Users,
    Leads,
}

/// Abilities a principal can hold on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Ability {
    Read,
    Create,
    Update,
    Delete,
}

/// Format a permission string
pub fn format_permission(resource: Resource, ability: Ability) -> String {
    format!("{}:{}", resource, ability)
}

/// One parsed grant from a token claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grant {
    /// `*` — everything.
    All,
    /// `orders:*` — every ability on one resource.
    Resource(Resource),
    /// `orders:delete` — one ability on one resource.
    Exact(Resource, Ability),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionParseError {
    #[error("unknown resource in permission '{0}'")]
    UnknownResource(String),
    #[error("unknown ability in permission '{0}'")]
    UnknownAbility(String),
    #[error("malformed permission '{0}', expected 'resource:ability'")]
    Malformed(String),
}

/// Validated set of grants held by a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: HashSet<Grant>,
}

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses and validates claim strings. Any unknown token fails the
    /// whole set; a principal never ends up with a partially-understood
    /// permission list.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, PermissionParseError> {
        let mut grants = HashSet::new();
        for entry in raw {
            grants.insert(Grant::from_str(entry.as_ref())?);
        }
        Ok(Self { grants })
    }

    pub fn grant(&mut self, grant: Grant) {
        self.grants.insert(grant);
    }

    pub fn allows(&self, resource: Resource, ability: Ability) -> bool {
        self.grants.contains(&Grant::All)
            || self.grants.contains(&Grant::Resource(resource))
            || self.grants.contains(&Grant::Exact(resource, ability))
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl FromStr for Grant {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(Grant::All);
        }
        let (resource_raw, ability_raw) = s
            .split_once(':')
            .ok_or_else(|| PermissionParseError::Malformed(s.to_string()))?;
        let resource = Resource::from_str(resource_raw)
            .map_err(|_| PermissionParseError::UnknownResource(s.to_string()))?;
        if ability_raw == "*" {
            return Ok(Grant::Resource(resource));
        }
        let ability = Ability::from_str(ability_raw)
            .map_err(|_| PermissionParseError::UnknownAbility(s.to_string()))?;
        Ok(Grant::Exact(resource, ability))
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::All => write!(f, "*"),
            Grant::Resource(r) => write!(f, "{}:*", r),
            Grant::Exact(r, a) => write!(f, "{}:{}", r, a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_grant_allows_only_that_pair() {
        let set = PermissionSet::parse(&["orders:delete"]).unwrap();
        assert!(set.allows(Resource::Orders, Ability::Delete));
        assert!(!set.allows(Resource::Orders, Ability::Read));
        assert!(!set.allows(Resource::Clients, Ability::Delete));
    }

    #[test]
    fn resource_wildcard_covers_every_ability() {
        let set = PermissionSet::parse(&["movements:*"]).unwrap();
        assert!(set.allows(Resource::Movements, Ability::Read));
        assert!(set.allows(Resource::Movements, Ability::Create));
        assert!(!set.allows(Resource::Orders, Ability::Read));
    }

    #[test]
    fn global_wildcard_covers_everything() {
        let set = PermissionSet::parse(&["*"]).unwrap();
        assert!(set.allows(Resource::Users, Ability::Delete));
        assert!(set.allows(Resource::Leads, Ability::Create));
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let err = PermissionSet::parse(&["warranties:read"]).unwrap_err();
        assert_eq!(
            err,
            PermissionParseError::UnknownResource("warranties:read".to_string())
        );
    }

    #[test]
    fn unknown_ability_is_rejected() {
        let err = PermissionSet::parse(&["orders:approve"]).unwrap_err();
        assert_eq!(
            err,
            PermissionParseError::UnknownAbility("orders:approve".to_string())
        );
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = PermissionSet::parse(&["orders"]).unwrap_err();
        assert_eq!(err, PermissionParseError::Malformed("orders".to_string()));
    }

    #[test]
    fn grant_strings_round_trip() {
        for raw in ["*", "orders:*", "productionpointings:create"] {
            let grant = Grant::from_str(raw).unwrap();
            assert_eq!(grant.to_string(), raw);
        }
    }
}
