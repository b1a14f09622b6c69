use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, FromRequest, HttpRequest};

use crate::errors::AppError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Caller identified by a verified `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub uid: String,
}

/// Marker for requests carrying the configured back-office key.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not registered".to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(app_state(req).and_then(|state| {
            let token = bearer_token(req.headers())
                .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
            let claims = state.verifier.verify(token)?;
            Ok(Authenticated { uid: claims.uid })
        }))
    }
}

impl FromRequest for AdminKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(app_state(req).and_then(|state| {
            let given = req
                .headers()
                .get(ADMIN_KEY_HEADER)
                .and_then(|h| h.to_str().ok());
            match given {
                Some(key) if key == state.admin_api_key => Ok(AdminKey),
                _ => {
                    log::warn!("rejected back-office request to {}", req.path());
                    Err(AppError::Unauthorized("Invalid admin key".to_string()))
                }
            }
        }))
    }
}
