use bigdecimal::BigDecimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const SIGN_UP_CODE_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct SalesPartner {
    pub id: Uuid,
    pub partner_name: String,
    pub commission_rate: BigDecimal,
    pub firebase_uid: Option<String>,
    pub fcm_token: Option<String>,
    pub sign_up_code: Option<String>,
}

impl SalesPartner {
    pub fn is_signed_up(&self) -> bool {
        self.firebase_uid.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewSalesPartner {
    pub partner_name: String,
    pub commission_rate: BigDecimal,
}

/// Fresh single-use code for linking a partner to a sign-in identity. The
/// partner id is mixed with a random salt so regenerating always yields a
/// new value.
pub fn generate_sign_up_code(partner_id: Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("Sales Partner:{partner_id}"));
    hasher.update(Uuid::new_v4().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..SIGN_UP_CODE_LEN].to_uppercase()
}

/// Codes are typed by people, so surrounding space and case are ignored.
pub fn normalize_sign_up_code(code: &str) -> String {
    code.trim().to_uppercase()
}
