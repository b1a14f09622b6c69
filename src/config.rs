use std::env;

use thiserror::Error;

use crate::domain::customer::CustomerDefaults;
use crate::domain::pagination::MAX_PAGE_LENGTH;

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
    #[error("one of AUTH_JWT_SECRET or AUTH_PUBLIC_KEY_PEM must be set")]
    MissingAuthKey,
}

/// Key material used to check sign-in token signatures.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthKey {
    /// HS256 shared secret.
    Secret(String),
    /// Path to an RS256 public key in PEM form.
    PublicKeyPem(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub project_id: String,
    pub key: AuthKey,
}

impl AuthConfig {
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FcmConfig {
    pub server_key: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontSettings {
    pub price_list: String,
    pub products_per_page: i64,
    pub customer_group: String,
    pub territory: String,
}

impl StorefrontSettings {
    pub fn customer_defaults(&self) -> CustomerDefaults {
        CustomerDefaults {
            customer_group: self.customer_group.clone(),
            territory: self.territory.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_api_key: String,
    pub auth: AuthConfig,
    pub fcm: Option<FcmConfig>,
    pub storefront: StorefrontSettings,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let key = match (get("AUTH_JWT_SECRET"), get("AUTH_PUBLIC_KEY_PEM")) {
            (_, Some(path)) => AuthKey::PublicKeyPem(path),
            (Some(secret), None) => AuthKey::Secret(secret),
            (None, None) => return Err(ConfigError::MissingAuthKey),
        };

        let products_per_page = match get("PRODUCTS_PER_PAGE") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if (1..=MAX_PAGE_LENGTH).contains(&n) => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "PRODUCTS_PER_PAGE",
                        value: raw,
                    })
                }
            },
            None => 20,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            admin_api_key: required("ADMIN_API_KEY")?,
            auth: AuthConfig {
                project_id: required("AUTH_PROJECT_ID")?,
                key,
            },
            fcm: get("FCM_SERVER_KEY").map(|server_key| FcmConfig {
                server_key,
                endpoint: get("FCM_ENDPOINT").unwrap_or_else(|| DEFAULT_FCM_ENDPOINT.to_string()),
            }),
            storefront: StorefrontSettings {
                price_list: get("STOREFRONT_PRICE_LIST")
                    .unwrap_or_else(|| "Standard Selling".to_string()),
                products_per_page,
                customer_group: get("DEFAULT_CUSTOMER_GROUP")
                    .unwrap_or_else(|| "Individual".to_string()),
                territory: get("DEFAULT_TERRITORY")
                    .unwrap_or_else(|| "All Territories".to_string()),
            },
        })
    }
}
