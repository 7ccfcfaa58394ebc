use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

const EXP: &str = "exp";
const IAT: &str = "iat";

/// Decoded token payload: the caller's claim set plus the validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub exp: usize,
    pub iat: usize,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AuthClaims {
    pub fn email(&self) -> Option<&str> {
        self.fields.get("email").and_then(Value::as_str)
    }
}

/// Signs and verifies HS256 identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `fields` with the configured validity window.
    pub fn issue(&self, fields: Map<String, Value>) -> Result<String, AuthError> {
        self.issue_with_ttl(fields, self.ttl)
    }

    /// Sign `fields`, expiring `ttl` from now. Caller supplied `exp`/`iat`
    /// keys are replaced.
    pub fn issue_with_ttl(
        &self,
        mut fields: Map<String, Value>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        fields.remove(EXP);
        fields.remove(IAT);

        let now = Utc::now();
        let claims = AuthClaims {
            exp: to_timestamp((now + ttl).timestamp())?,
            iat: to_timestamp(now.timestamp())?,
            fields,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        decode::<AuthClaims>(token, &self.decoding, &validation())
            .map(|decoded| decoded.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(err.to_string()),
            })
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

fn to_timestamp(seconds: i64) -> Result<usize, AuthError> {
    usize::try_from(seconds)
        .map_err(|_| AuthError::Signing("Failed to encode token timestamp".to_string()))
}
