//! JWT token management
//!
//! HS256 access tokens returned in the `Access-Token` header after login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity::users;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};

use super::types::{JWT_AUDIENCE, JWT_ISSUER, JwtClaims};
use super::{Credential, CredentialIssuer};
use crate::config::AuthConfig;
use crate::error::{AppError, Result};

/// JWT token manager
pub struct JwtManager {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Validation configuration
    validation: Validation,
    /// Authentication configuration
    config: Arc<AuthConfig>,
}

impl JwtManager {
    /// Create new JWT manager
    pub fn new(config: Arc<AuthConfig>) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::config("JWT secret must not be empty"));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 30;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Generate access token
    pub fn generate_access_token(&self, user_id: i32, email: &str, name: &str) -> Result<String> {
        let claims = JwtClaims::new(
            user_id,
            email.to_string(),
            name.to_string(),
            self.config.jwt_expires_in,
        );
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &JwtClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal_with_source("Token generation failed", e))
    }

    /// Validate and parse token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        let token_data: TokenData<JwtClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::auth_with_source("Access token has expired", e)
                }
                _ => AppError::auth_with_source("Invalid access token", e),
            })?;

        Ok(token_data.claims)
    }
}

impl CredentialIssuer for JwtManager {
    fn issue(&self, user: &users::Model) -> Result<Credential> {
        let claims = JwtClaims::new(
            user.id,
            user.email.clone(),
            user.name.clone(),
            self.config.jwt_expires_in,
        );
        let token = self.encode_claims(&claims)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        Ok(Credential { token, expires_at })
    }
}
