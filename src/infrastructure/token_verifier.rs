use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{AuthConfig, AuthKey};
use crate::domain::errors::DomainError;
use crate::domain::identity::IdentityClaims;
use crate::domain::ports::TokenVerifier;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("cannot read public key {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid public key: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: String,
}

/// Checks sign-in tokens issued for one identity project.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Result<Self, KeyError> {
        let (key, algorithm) = match &config.key {
            AuthKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            AuthKey::PublicKeyPem(path) => {
                let pem = std::fs::read(path).map_err(|source| KeyError::Read {
                    path: path.clone(),
                    source,
                })?;
                (DecodingKey::from_rsa_pem(&pem)?, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.project_id.as_str()]);

        Ok(Self { key, validation })
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                _ => "Invalid token",
            };
            log::debug!("rejected sign-in token: {}", e);
            DomainError::Unauthorized(reason.to_string())
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(DomainError::Unauthorized("Invalid token".to_string()));
        }
        Ok(IdentityClaims {
            uid: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";

    fn verifier() -> JwtTokenVerifier {
        JwtTokenVerifier::from_config(&AuthConfig {
            project_id: "storefront-test".to_string(),
            key: AuthKey::Secret(SECRET.to_string()),
        })
        .expect("verifier")
    }

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode")
    }

    fn claims(sub: &str, aud: &str, exp_in: Duration) -> serde_json::Value {
        json!({
            "sub": sub,
            "aud": aud,
            "iss": "https://securetoken.google.com/storefront-test",
            "exp": (Utc::now() + exp_in).timestamp(),
        })
    }

    #[test]
    fn valid_token_yields_uid() {
        let t = token(claims("uid-42", "storefront-test", Duration::hours(1)));
        assert_eq!(verifier().verify(&t).unwrap().uid, "uid-42");
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let t = token(claims("uid-42", "other-project", Duration::hours(1)));
        assert!(matches!(
            verifier().verify(&t),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let t = token(claims("uid-42", "storefront-test", Duration::hours(-2)));
        let err = verifier().verify(&t).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized("Token expired".to_string()));
    }

    #[test]
    fn empty_subject_is_invalid() {
        let t = token(claims("", "storefront-test", Duration::hours(1)));
        let err = verifier().verify(&t).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized("Invalid token".to_string()));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verifier().verify("not-a-jwt").is_err());
    }

    #[test]
    fn missing_pem_file_fails_at_startup() {
        let result = JwtTokenVerifier::from_config(&AuthConfig {
            project_id: "p".to_string(),
            key: AuthKey::PublicKeyPem("/nonexistent/key.pem".to_string()),
        });
        assert!(matches!(result, Err(KeyError::Read { .. })));
    }
}
