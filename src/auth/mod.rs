/*!
 * # Authentication and Authorization Module
 *
 * Bearer-token (JWT) authentication resolving to an explicit [`AuthUser`]
 * principal carried through request extensions — handlers and services
 * never read an ambient global. Authorization is typed: claims are parsed
 * into a [`PermissionSet`] at validation time and route groups are gated
 * through the per-resource authorizer registry.
 *
 * Token issuance (login/refresh) is out of scope; this service only
 * validates tokens minted by the identity provider.
 */

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

mod authorizer;
mod permissions;

pub use authorizer::{authorize, Authorizer, AuthorizerRegistry, Decision, REGISTRY};
pub use permissions::{
    format_permission, Ability, Grant, PermissionParseError, PermissionSet, Resource,
};

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Subject (user ID)
    pub name: Option<String>,     // User's name
    pub roles: Vec<String>,       // User's roles
    pub permissions: Vec<String>, // "resource:ability" grants
    pub jti: String,              // JWT ID
    pub iat: i64,                 // Issued at time
    pub exp: i64,                 // Expiration time
    pub iss: String,              // Issuer
    pub aud: String,              // Audience
}

/// Authenticated principal, with permissions already parsed and validated.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: PermissionSet,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    pub fn can(&self, resource: Resource, ability: Ability) -> bool {
        authorize(self, resource, ability).is_allow()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authentication")]
    MissingAuth,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("invalid permission claim: {0}")]
    InvalidPermission(#[from] PermissionParseError),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("internal auth error: {0}")]
    InternalError(String),
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuth
            | AuthError::InvalidToken(_)
            | AuthError::InvalidPermission(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": self.to_string(),
            "request_id": crate::tracing_ctx::current_request_id().map(|r| r.as_str().to_string()),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        (status, Json(body)).into_response()
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, jwt_issuer: String, jwt_audience: String) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
        }
    }
}

/// Validates inbound bearer tokens and resolves them to principals.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }

    /// Validates a token and builds the typed principal. Unknown
    /// permission strings fail authentication here rather than surfacing
    /// later as silent denials.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.validate_token(token)?;
        let permissions = PermissionSet::parse(&claims.permissions)?;
        Ok(AuthUser {
            user_id: claims.sub,
            name: claims.name,
            roles: claims.roles,
            permissions,
        })
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication middleware that extracts and validates bearer tokens.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("authentication service not available".to_string())
                .into_response();
        }
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => return AuthError::MissingAuth.into_response(),
    };

    match auth_service.authenticate(token) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Permission middleware gating a route group on one (resource, ability).
pub async fn permission_middleware(
    State((resource, ability)): State<(Resource, Ability)>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingAuth)?;

    match authorize(&user, resource, ability) {
        Decision::Allow => Ok(next.run(request).await),
        Decision::Deny(reason) => Err(AuthError::Forbidden(reason)),
    }
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, resource: Resource, ability: Ability) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, resource: Resource, ability: Ability) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            (resource, ability),
            permission_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-1234";

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(
            SECRET.to_string(),
            "moldline-auth".to_string(),
            "moldline-api".to_string(),
        ))
    }

    fn token_with_permissions(permissions: Vec<String>) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            name: Some("Pat".to_string()),
            roles: vec!["operator".to_string()],
            permissions,
            jti: "jti-1".to_string(),
            iat: now,
            exp: now + 3600,
            iss: "moldline-auth".to_string(),
            aud: "moldline-api".to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_typed_principal() {
        let token = token_with_permissions(vec!["orders:read".to_string(), "movements:*".to_string()]);
        let user = service().authenticate(&token).unwrap();
        assert!(user.permissions.allows(Resource::Orders, Ability::Read));
        assert!(user.permissions.allows(Resource::Movements, Ability::Create));
        assert!(!user.permissions.allows(Resource::Orders, Ability::Delete));
    }

    #[test]
    fn unknown_permission_claim_fails_authentication() {
        let token = token_with_permissions(vec!["warranties:read".to_string()]);
        let err = service().authenticate(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidPermission(_)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = service().authenticate("not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
