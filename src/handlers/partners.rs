use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::extract::{AdminKey, Authenticated};
use super::{blocking, money, FcmTokenRequest};
use crate::domain::partner::{NewSalesPartner, SalesPartner};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePartnerRequest {
    pub partner_name: String,
    /// Percentage as a decimal string, e.g. "7.5"
    pub commission_rate: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerResponse {
    pub id: Uuid,
    pub partner_name: String,
    pub commission_rate: String,
    pub signed_up: bool,
}

impl From<SalesPartner> for PartnerResponse {
    fn from(p: SalesPartner) -> Self {
        Self {
            signed_up: p.is_signed_up(),
            commission_rate: money(&p.commission_rate),
            id: p.id,
            partner_name: p.partner_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpCodeResponse {
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub code: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner created", body = PartnerResponse),
        (status = 400, description = "Bad name or commission rate"),
        (status = 409, description = "Partner name taken"),
    ),
    tag = "admin"
)]
pub async fn create_partner(
    state: web::Data<AppState>,
    _admin: AdminKey,
    body: web::Json<CreatePartnerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let commission_rate = BigDecimal::from_str(body.commission_rate.trim()).map_err(|e| {
        AppError::BadRequest(format!(
            "Invalid commission_rate '{}': {}",
            body.commission_rate, e
        ))
    })?;
    let partner = NewSalesPartner {
        partner_name: body.partner_name,
        commission_rate,
    };
    let created = blocking(move || state.partners.create_partner(partner)).await?;
    Ok(HttpResponse::Created().json(PartnerResponse::from(created)))
}

/// POST /api/admin/partners/{id}/signup-code
///
/// Issues a new sign-up code; any earlier code stops working.
#[utoipa::path(
    post,
    path = "/api/admin/partners/{id}/signup-code",
    params(("id" = Uuid, Path, description = "Sales partner id")),
    responses(
        (status = 200, description = "Fresh code", body = SignUpCodeResponse),
        (status = 404, description = "Partner not found"),
        (status = 409, description = "Sign-up already completed"),
    ),
    tag = "admin"
)]
pub async fn generate_signup_code(
    state: web::Data<AppState>,
    _admin: AdminKey,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let partner_id = path.into_inner();
    let code = blocking(move || state.partners.generate_signup_code(partner_id)).await?;
    Ok(HttpResponse::Ok().json(SignUpCodeResponse { code }))
}

/// POST /api/partner/signup
///
/// Links the signed-in account to the partner holding `code`. Each code
/// works once.
#[utoipa::path(
    post,
    path = "/api/partner/signup",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account linked", body = PartnerResponse),
        (status = 400, description = "Invalid or used sign-up code"),
        (status = 409, description = "Account already linked to a partner"),
    ),
    tag = "partners"
)]
pub async fn signup(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let code = body.into_inner().code;
    let partner = blocking(move || state.partners.signup(&user.uid, &code)).await?;
    Ok(HttpResponse::Ok().json(PartnerResponse::from(partner)))
}

#[utoipa::path(
    get,
    path = "/api/partner",
    responses(
        (status = 200, description = "Partner linked to this account", body = PartnerResponse),
        (status = 404, description = "No sales partner linked to this account"),
    ),
    tag = "partners"
)]
pub async fn get_partner(
    state: web::Data<AppState>,
    user: Authenticated,
) -> Result<HttpResponse, AppError> {
    let partner = blocking(move || state.partners.get_partner(&user.uid)).await?;
    Ok(HttpResponse::Ok().json(PartnerResponse::from(partner)))
}

#[utoipa::path(
    put,
    path = "/api/partner/fcm-token",
    request_body = FcmTokenRequest,
    responses(
        (status = 204, description = "Token stored"),
        (status = 404, description = "No sales partner linked to this account"),
    ),
    tag = "partners"
)]
pub async fn update_fcm_token(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<FcmTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let token = body.into_inner().token;
    blocking(move || state.partners.update_fcm_token(&user.uid, &token)).await?;
    Ok(HttpResponse::NoContent().finish())
}
