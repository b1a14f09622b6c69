use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::partner::{NewSalesPartner, SalesPartner};
use crate::domain::ports::PartnerRepository;
use crate::schema::sales_partners;

use super::models::{NewSalesPartnerRow, SalesPartnerRow};

pub struct DieselPartnerRepository {
    pool: DbPool,
}

impl DieselPartnerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_by_uid(conn: &mut PgConnection, uid: &str) -> QueryResult<Option<SalesPartnerRow>> {
    sales_partners::table
        .filter(sales_partners::firebase_uid.eq(uid))
        .select(SalesPartnerRow::as_select())
        .first(conn)
        .optional()
}

impl PartnerRepository for DieselPartnerRepository {
    fn create(&self, partner: NewSalesPartner) -> Result<SalesPartner, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::insert_into(sales_partners::table)
            .values(&NewSalesPartnerRow {
                id: Uuid::new_v4(),
                partner_name: partner.partner_name,
                commission_rate: partner.commission_rate,
            })
            .returning(SalesPartnerRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<SalesPartner>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = sales_partners::table
            .find(id)
            .select(SalesPartnerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(SalesPartner::from))
    }

    fn find_by_uid(&self, uid: &str) -> Result<Option<SalesPartner>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(find_by_uid(&mut conn, uid)?.map(SalesPartner::from))
    }

    fn replace_sign_up_code(&self, id: Uuid, code: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let exists = sales_partners::table
                .find(id)
                .select(sales_partners::id)
                .first::<Uuid>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(DomainError::not_found("Sales Partner"));
            }

            let updated = diesel::update(
                sales_partners::table
                    .filter(sales_partners::id.eq(id))
                    .filter(sales_partners::firebase_uid.is_null()),
            )
            .set(sales_partners::sign_up_code.eq(code))
            .execute(conn)?;
            Ok(updated == 1)
        })
    }

    fn claim_sign_up_code(&self, code: &str, uid: &str) -> Result<Option<SalesPartner>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if find_by_uid(conn, uid)?.is_some() {
                return Err(DomainError::Conflict(
                    "This account is already linked to a sales partner".to_string(),
                ));
            }

            // Matching on the code and an unlinked uid in the same statement
            // makes a second claim of the same code update nothing.
            let row = diesel::update(
                sales_partners::table
                    .filter(sales_partners::sign_up_code.eq(code))
                    .filter(sales_partners::firebase_uid.is_null()),
            )
            .set((
                sales_partners::firebase_uid.eq(uid),
                sales_partners::sign_up_code.eq(None::<String>),
            ))
            .returning(SalesPartnerRow::as_returning())
            .get_result(conn)
            .optional()?;

            Ok(row.map(SalesPartner::from))
        })
    }

    fn set_fcm_token(&self, id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(sales_partners::table.find(id))
            .set(sales_partners::fcm_token.eq(token))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::not_found("Sales Partner"));
        }
        Ok(())
    }
}
