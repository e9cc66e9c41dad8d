use serde::{Deserialize, Serialize};

/// Claims carried by access tokens issued by the console's auth service.
/// This backend only validates tokens, it never mints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub username: String,
    pub is_admin: bool,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}
