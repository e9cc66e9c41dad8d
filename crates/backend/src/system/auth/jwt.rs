use anyhow::{Context, Result};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::shared::config;

/// Validate a token minted by the console's auth service and extract its
/// claims. Expiration is checked by the default validation.
pub fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = &config::get()?.auth.jwt_secret;

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}
