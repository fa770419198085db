//! Authentication service for user registration, login, and token validation

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{validate_username, NewUser, User};
use validator::Validate;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: DynStore,
    jwt_secret: String,
    access_token_expiry: i64,
    bcrypt_cost: u32,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Response of a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: DynStore, jwt: &JwtConfig) -> Self {
        Self {
            store,
            jwt_secret: jwt.secret.clone(),
            access_token_expiry: jwt.access_token_expiry,
            bcrypt_cost: jwt.bcrypt_cost,
        }
    }

    /// Register a new user account
    pub async fn register(&self, input: NewUser) -> AppResult<User> {
        input.validate()?;
        validate_username(&input.username).map_err(|msg| AppError::validation("username", msg))?;

        if self.store.find_user_by_username(&input.username).await?.is_some() {
            return Err(AppError::DuplicateUser(input.username));
        }

        let password_hash = hash(&input.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self.store.insert_user(&input.username, &password_hash).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        let account = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &account.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::debug!(username = %account.username, "User logged in");

        self.issue_token(&account.username)
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.validate_token(token)?;

        self.store
            .find_user_by_username(&claims.sub)
            .await?
            .map(|account| account.user())
            .ok_or(AppError::InvalidToken)
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::InvalidToken
        })?;

        Ok(token_data.claims)
    }

    fn issue_token(&self, username: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
