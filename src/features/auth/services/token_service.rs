use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use crate::features::users::models::User;
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};

/// Issued bearer token
#[derive(Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Service for issuing HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs(),
        }
    }

    /// Create an access token carrying the user's id, username and role
    pub fn create_token(&self, user: &User) -> Result<IssuedToken> {
        let now = get_current_timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::debug!(
            "Issued token for user {}, expires in {} seconds",
            user.username,
            self.ttl_secs
        );

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use crate::features::users::models::UserRole;
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    fn config(ttl: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "tofs-test".to_string(),
            token_ttl: Duration::from_secs(ttl),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Budi Santoso".to_string(),
            username: "budi".to_string(),
            email: "budi@example.com".to_string(),
            password_hash: String::new(),
            role,
            work_location: Some("BRAVO".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_validates_to_same_identity() {
        let cfg = config(3600);
        let service = TokenService::new(&cfg);
        let validator = JwtValidator::new(&cfg);
        let u = user(UserRole::Admin);

        let token = service.create_token(&u).unwrap();
        assert_eq!(token.expires_in, 3600);

        let authenticated = validator.validate_token(&token.access_token).unwrap();
        assert_eq!(authenticated.user_id, u.id);
        assert_eq!(authenticated.username, "budi");
        assert_eq!(authenticated.role, UserRole::Admin);
    }

    #[test]
    fn test_token_from_other_issuer_is_rejected() {
        let service = TokenService::new(&config(3600));
        let mut other = config(3600);
        other.issuer = "someone-else".to_string();
        let validator = JwtValidator::new(&other);

        let token = service.create_token(&user(UserRole::Pengguna)).unwrap();
        assert!(matches!(
            validator.validate_token(&token.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = TokenService::new(&config(3600));
        let mut other = config(3600);
        other.jwt_secret = "ffffffffffffffffffffffffffffffff".to_string();
        let validator = JwtValidator::new(&other);

        let token = service.create_token(&user(UserRole::Pengguna)).unwrap();
        assert!(validator.validate_token(&token.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let validator = JwtValidator::new(&config(3600));
        assert!(validator.validate_token("not-a-jwt").is_err());
    }
}
