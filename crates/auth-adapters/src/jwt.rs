//! HS256 bearer tokens. The claim set is deliberately small: subject and
//! lifetime. Roles are looked up fresh on every request, never baked into
//! the token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::{AppError, Result, TokenIssuer};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<Uuid> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))
    }
}
