use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AccessToken, TokenClaims, TokenIssuer};

/// JWT payload. `sub` is the user id, `exp` and `iat` are unix seconds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  sub: String,
  email: String,
  exp: i64,
  iat: i64,
}

/// HMAC-signed JWT implementation of the TokenIssuer trait.
///
/// Tokens are stateless: nothing is stored server-side and there is no
/// revocation, so they stay valid until `exp`.
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

impl JwtTokenIssuer {
  pub fn new(secret: &str, ttl_days: i64) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl: Duration::days(ttl_days),
    }
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError> {
    let now = Utc::now();
    let expires_at = now + self.ttl;

    let claims = Claims {
      sub: user_id.to_string(),
      email: email.to_string(),
      exp: expires_at.timestamp(),
      iat: now.timestamp(),
    };

    let token = encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
      .map_err(|_| AuthError::InvalidToken)?;

    Ok(AccessToken { token, expires_at })
  }

  fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
    let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
      .map_err(|_| AuthError::InvalidToken)?;

    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

    Ok(TokenClaims {
      user_id,
      email: data.claims.email,
    })
  }
}
