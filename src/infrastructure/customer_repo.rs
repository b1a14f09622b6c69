use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::{
    Address, AddressInput, Customer, CustomerDefaults, CustomerSignup, INDIVIDUAL,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;
use crate::schema::{addresses, customers};

use super::models::{AddressChangeset, AddressRow, CustomerRow, NewAddressRow, NewCustomerRow};

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_by_uid(conn: &mut PgConnection, uid: &str) -> QueryResult<Option<CustomerRow>> {
    customers::table
        .filter(customers::firebase_uid.eq(uid))
        .select(CustomerRow::as_select())
        .first(conn)
        .optional()
}

fn address_fields(input: AddressInput) -> AddressChangeset {
    AddressChangeset {
        address_line1: input.address_line1,
        address_line2: input.address_line2,
        city: input.city,
        state: input.state,
        country: input.country,
        pincode: input.pincode,
        is_primary: input.is_primary,
    }
}

/// Only one address per customer is primary.
fn clear_primary(conn: &mut PgConnection, customer_id: Uuid, keep: Uuid) -> QueryResult<usize> {
    diesel::update(
        addresses::table
            .filter(addresses::customer_id.eq(customer_id))
            .filter(addresses::id.ne(keep)),
    )
    .set(addresses::is_primary.eq(false))
    .execute(conn)
}

fn insert_address(
    conn: &mut PgConnection,
    customer_id: Uuid,
    input: AddressInput,
) -> Result<AddressRow, DomainError> {
    let id = Uuid::new_v4();
    if input.is_primary {
        clear_primary(conn, customer_id, id)?;
    }
    let row = diesel::insert_into(addresses::table)
        .values(&NewAddressRow {
            id,
            customer_id,
            fields: address_fields(input),
        })
        .returning(AddressRow::as_returning())
        .get_result(conn)?;
    Ok(row)
}

impl CustomerRepository for DieselCustomerRepository {
    fn find_by_uid(&self, uid: &str) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(find_by_uid(&mut conn, uid)?.map(Customer::from))
    }

    fn get_or_create(
        &self,
        uid: &str,
        signup: CustomerSignup,
        defaults: &CustomerDefaults,
    ) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if let Some(existing) = find_by_uid(conn, uid)? {
                return Ok(existing.into());
            }

            let id = Uuid::new_v4();
            // A concurrent sign-up with the same uid makes this a no-op; the
            // re-read below then returns the winner.
            let inserted = diesel::insert_into(customers::table)
                .values(&NewCustomerRow {
                    id,
                    customer_name: signup.customer_name,
                    customer_type: INDIVIDUAL.to_string(),
                    customer_group: defaults.customer_group.clone(),
                    territory: defaults.territory.clone(),
                    mobile_no: signup.mobile_no,
                    email: signup.email,
                    firebase_uid: Some(uid.to_string()),
                })
                .on_conflict(customers::firebase_uid)
                .do_nothing()
                .execute(conn)?;

            if inserted == 1 {
                if let Some(address) = signup.address {
                    insert_address(conn, id, address)?;
                }
                log::info!("created customer {} for new sign-in", id);
            }

            find_by_uid(conn, uid)?
                .map(Customer::from)
                .ok_or_else(|| DomainError::Internal("customer missing after insert".to_string()))
        })
    }

    fn set_fcm_token(&self, customer_id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(customers::table.find(customer_id))
            .set((
                customers::fcm_token.eq(token),
                customers::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::not_found("Customer"));
        }
        Ok(())
    }

    fn list_addresses(&self, customer_id: Uuid) -> Result<Vec<Address>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = addresses::table
            .filter(addresses::customer_id.eq(customer_id))
            .order((addresses::is_primary.desc(), addresses::created_at.asc()))
            .select(AddressRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Address::from).collect())
    }

    fn create_address(&self, customer_id: Uuid, input: AddressInput) -> Result<Address, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            Ok(insert_address(conn, customer_id, input)?.into())
        })
    }

    fn update_address(
        &self,
        customer_id: Uuid,
        address_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            if input.is_primary {
                clear_primary(conn, customer_id, address_id)?;
            }
            let row = diesel::update(
                addresses::table
                    .filter(addresses::id.eq(address_id))
                    .filter(addresses::customer_id.eq(customer_id)),
            )
            .set(&address_fields(input))
            .returning(AddressRow::as_returning())
            .get_result(conn)
            .optional()?;

            row.map(Address::from)
                .ok_or_else(|| DomainError::not_found("Address"))
        })
    }
}
