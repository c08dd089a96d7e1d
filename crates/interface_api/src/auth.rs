//! Authentication and authorization
//!
//! Tokens are issued elsewhere; this module validates them and exposes the
//! caller as an [`AuthUser`] extractor. Decision handlers take the caller's
//! id as the opaque admin id stamped on the claim.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{AdminId, UserId};
use domain_claims::ClaimantProfile;

use crate::error::ApiError;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPermission(p) => ApiError::Forbidden(format!("missing permission {}", p)),
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized,
        }
    }
}

/// Identity carried in a token
#[derive(Debug, Clone, Default)]
pub struct TokenIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `identity` - Display name and email echoed onto claims the user files
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    identity: TokenIdentity,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        name: identity.name,
        email: identity.email,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

/// Permission definitions
pub mod permissions {
    /// Read any claim and the review queue
    pub const CLAIM_REVIEW: &str = "claim:review";
    /// Approve, reject or request documents
    pub const CLAIM_APPROVE: &str = "claim:approve";
    /// Inspect and resolve partial transitions
    pub const CLAIM_RECONCILE: &str = "claim:reconcile";
}

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub claims: Claims,
}

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.id)
    }

    pub fn admin_id(&self) -> AdminId {
        AdminId::from_uuid(self.id)
    }

    /// Claimant snapshot taken at submission time
    ///
    /// Falls back to the email as display name; a token without an email
    /// yields an empty address, which submission validation rejects.
    pub fn claimant_profile(&self) -> ClaimantProfile {
        let email = self.claims.email.clone().unwrap_or_default();
        ClaimantProfile {
            id: self.user_id(),
            name: self.claims.name.clone().unwrap_or_else(|| email.clone()),
            email,
        }
    }

    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        if has_role(&self.claims, permission) {
            Ok(())
        } else {
            Err(AuthError::MissingPermission(permission.to_string()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(ApiError::Unauthorized)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;
        Ok(AuthUser { id, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let user = Uuid::new_v4().to_string();
        let token = create_token(
            &user,
            vec![permissions::CLAIM_REVIEW.to_string()],
            TokenIdentity {
                name: Some("Casey".to_string()),
                email: Some("casey@example.test".to_string()),
            },
            SECRET,
            60,
        )
        .unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.email.as_deref(), Some("casey@example.test"));
        assert!(has_role(&claims, permissions::CLAIM_REVIEW));
        assert!(!has_role(&claims, permissions::CLAIM_APPROVE));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token("u", vec![], TokenIdentity::default(), SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_admin_role_grants_everything() {
        let claims = Claims {
            sub: "u".to_string(),
            roles: vec!["admin".to_string()],
            exp: 0,
            iat: 0,
            name: None,
            email: None,
        };
        assert!(has_role(&claims, permissions::CLAIM_RECONCILE));
    }

    #[test]
    fn test_profile_falls_back_to_email() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            claims: Claims {
                sub: String::new(),
                roles: vec![],
                exp: 0,
                iat: 0,
                name: None,
                email: Some("jo@example.test".to_string()),
            },
        };
        let profile = user.claimant_profile();
        assert_eq!(profile.name, "jo@example.test");
        assert_eq!(profile.id, user.user_id());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn role_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("claimant".to_string()),
                Just(permissions::CLAIM_REVIEW.to_string()),
                Just(permissions::CLAIM_APPROVE.to_string()),
                Just(permissions::CLAIM_RECONCILE.to_string()),
                "[a-z]{1,12}",
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_token_carries_identity_and_roles(
                roles in proptest::collection::vec(role_strategy(), 0..4),
                name in proptest::option::of("[A-Za-z ]{1,20}"),
                email in proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.test"),
            ) {
                let user = Uuid::new_v4();
                let token = create_token(
                    &user.to_string(),
                    roles.clone(),
                    TokenIdentity { name: name.clone(), email: email.clone() },
                    SECRET,
                    60,
                )
                .unwrap();

                let claims = validate_token(&token, SECRET).unwrap();
                prop_assert_eq!(&claims.sub, &user.to_string());
                prop_assert_eq!(&claims.roles, &roles);
                prop_assert_eq!(&claims.name, &name);
                prop_assert_eq!(&claims.email, &email);

                let is_admin = roles.iter().any(|r| r == "admin");
                let reviews = roles.iter().any(|r| r == permissions::CLAIM_REVIEW);
                prop_assert_eq!(has_role(&claims, permissions::CLAIM_REVIEW), reviews || is_admin);
            }
        }
    }
}
