use uuid::Uuid;

pub const INDIVIDUAL: &str = "Individual";

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_type: String,
    pub customer_group: String,
    pub territory: String,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub fcm_token: Option<String>,
}

/// What the storefront exposes about the signed-in customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub name: Uuid,
    pub customer_name: String,
}

impl From<&Customer> for CustomerSummary {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.id,
            customer_name: c.customer_name.clone(),
        }
    }
}

/// Sign-up form. Unknown fields sent by clients are dropped before this is
/// built.
#[derive(Debug, Clone, Default)]
pub struct CustomerSignup {
    pub customer_name: String,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressInput>,
}

/// Defaults applied to customers created from the storefront.
#[derive(Debug, Clone)]
pub struct CustomerDefaults {
    pub customer_group: String,
    pub territory: String,
}

#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub is_primary: bool,
}

impl AddressInput {
    /// Builds an address from the loose sign-up fields. Line 1 and city are
    /// required; anything less is not an address.
    pub fn from_parts(
        address_line1: Option<String>,
        address_line2: Option<String>,
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
        pincode: Option<String>,
    ) -> Option<Self> {
        let address_line1 = address_line1.filter(|s| !s.trim().is_empty())?;
        let city = city.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            address_line1,
            address_line2,
            city,
            state,
            country,
            pincode,
            is_primary: true,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub is_primary: bool,
}
