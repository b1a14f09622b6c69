use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::extract::Authenticated;
use super::{blocking, FcmTokenRequest};
use crate::domain::customer::{Address, AddressInput, CustomerSignup, CustomerSummary};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    /// Customer record id.
    pub name: Uuid,
    pub customer_name: String,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(c: CustomerSummary) -> Self {
        Self {
            name: c.name,
            customer_name: c.customer_name,
        }
    }
}

/// Sign-up form. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub customer_name: String,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

impl From<CreateCustomerRequest> for CustomerSignup {
    fn from(r: CreateCustomerRequest) -> Self {
        let address = AddressInput::from_parts(
            r.address_line1,
            r.address_line2,
            r.city,
            r.state,
            r.country,
            r.pincode,
        );
        CustomerSignup {
            customer_name: r.customer_name,
            mobile_no: r.mobile_no,
            email: r.email,
            address,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl From<AddressRequest> for AddressInput {
    fn from(r: AddressRequest) -> Self {
        AddressInput {
            address_line1: r.address_line1,
            address_line2: r.address_line2,
            city: r.city,
            state: r.state,
            country: r.country,
            pincode: r.pincode,
            is_primary: r.is_primary,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub is_primary: bool,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            address_line1: a.address_line1,
            address_line2: a.address_line2,
            city: a.city,
            state: a.state,
            country: a.country,
            pincode: a.pincode,
            is_primary: a.is_primary,
        }
    }
}

/// GET /api/customer
///
/// The customer linked to the signed-in account, or `null` before sign-up.
#[utoipa::path(
    get,
    path = "/api/customer",
    responses(
        (status = 200, description = "Linked customer or null", body = CustomerResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    state: web::Data<AppState>,
    user: Authenticated,
) -> Result<HttpResponse, AppError> {
    let customer = blocking(move || state.customers.get_customer(&user.uid)).await?;
    Ok(HttpResponse::Ok().json(customer.map(CustomerResponse::from)))
}

/// POST /api/customer
///
/// Links a customer to the signed-in account, creating it on first call.
#[utoipa::path(
    post,
    path = "/api/customer",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Existing or new customer", body = CustomerResponse),
        (status = 400, description = "Missing customer name"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let signup = CustomerSignup::from(body.into_inner());
    let customer = blocking(move || state.customers.create_customer(&user.uid, signup)).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

#[utoipa::path(
    put,
    path = "/api/customer/fcm-token",
    request_body = FcmTokenRequest,
    responses(
        (status = 204, description = "Token stored"),
        (status = 404, description = "No customer linked to this account"),
    ),
    tag = "customers"
)]
pub async fn update_fcm_token(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<FcmTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let token = body.into_inner().token;
    blocking(move || state.customers.update_fcm_token(&user.uid, &token)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/customer/addresses",
    responses(
        (status = 200, description = "Addresses of the signed-in customer", body = Vec<AddressResponse>),
        (status = 404, description = "No customer linked to this account"),
    ),
    tag = "customers"
)]
pub async fn list_addresses(
    state: web::Data<AppState>,
    user: Authenticated,
) -> Result<HttpResponse, AppError> {
    let addresses = blocking(move || state.customers.list_addresses(&user.uid)).await?;
    let body: Vec<AddressResponse> = addresses.into_iter().map(AddressResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    post,
    path = "/api/customer/addresses",
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Line 1 or city missing"),
        (status = 404, description = "No customer linked to this account"),
    ),
    tag = "customers"
)]
pub async fn create_address(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let input = AddressInput::from(body.into_inner());
    let address = blocking(move || state.customers.create_address(&user.uid, input)).await?;
    Ok(HttpResponse::Created().json(AddressResponse::from(address)))
}

/// PUT /api/customer/addresses/{id}
///
/// Another customer's address is reported as missing.
#[utoipa::path(
    put,
    path = "/api/customer/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address id")),
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Address updated", body = AddressResponse),
        (status = 404, description = "Address not found"),
    ),
    tag = "customers"
)]
pub async fn update_address(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
    body: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let address_id = path.into_inner();
    let input = AddressInput::from(body.into_inner());
    let address =
        blocking(move || state.customers.update_address(&user.uid, address_id, input)).await?;
    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}
