use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::delivery::{
    rounded_total, should_invoice, AssignmentGroup, DeliveryNote, DeliveryNoteItem,
    TransitionOutcome, WorkflowAction, WorkflowState, DOCSTATUS_SUBMITTED, MODE_OF_PAYMENT_CASH,
};
use crate::domain::errors::DomainError;
use crate::domain::grouping::group_children;
use crate::domain::order::OrderLineView;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::ports::DeliveryRepository;
use crate::schema::{
    customers, delivery_note_items, delivery_notes, invoice_payments, sales_invoices,
    sales_order_items, sales_orders, sales_partners,
};

use super::models::{
    DeliveryNoteItemRow, DeliveryNoteRow, NewDeliveryNoteItemRow, NewDeliveryNoteRow,
    NewInvoicePaymentRow, NewSalesInvoiceRow, SalesOrderItemRow,
};
use super::order_repo::held_lines;

pub struct DieselDeliveryRepository {
    pool: DbPool,
}

impl DieselDeliveryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn notes_of_partner(
    partner_id: Uuid,
    state: Option<WorkflowState>,
) -> delivery_notes::BoxedQuery<'static, Pg> {
    let mut query = delivery_notes::table
        .filter(delivery_notes::sales_partner_id.eq(partner_id))
        .into_boxed();
    if let Some(state) = state {
        query = query.filter(delivery_notes::workflow_state.eq(state.as_str()));
    }
    query
}

impl From<DeliveryNoteItemRow> for DeliveryNoteItem {
    fn from(r: DeliveryNoteItemRow) -> Self {
        DeliveryNoteItem {
            id: r.id,
            delivery_note_id: r.delivery_note_id,
            so_detail: r.so_detail,
            item_code: r.item_code,
            item_name: r.item_name,
            qty: r.qty,
            rate: r.rate,
            amount: r.amount,
        }
    }
}

/// Loads items and customer names for `rows` and builds full notes.
fn hydrate(
    conn: &mut PgConnection,
    rows: Vec<DeliveryNoteRow>,
) -> Result<Vec<DeliveryNote>, DomainError> {
    let note_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let customer_ids: Vec<Uuid> = rows.iter().map(|r| r.customer_id).collect();

    let names: HashMap<Uuid, String> = customers::table
        .filter(customers::id.eq_any(customer_ids))
        .select((customers::id, customers::customer_name))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect();

    let items = delivery_note_items::table
        .filter(delivery_note_items::delivery_note_id.eq_any(note_ids))
        .order((delivery_note_items::idx.asc(), delivery_note_items::id.asc()))
        .select(DeliveryNoteItemRow::as_select())
        .load(conn)?;

    let (grouped, _) = group_children(rows, items, |n| n.id, |i| i.delivery_note_id);
    grouped
        .into_iter()
        .map(|(row, items)| -> Result<DeliveryNote, DomainError> {
            Ok(DeliveryNote {
                id: row.id,
                sales_order_id: row.sales_order_id,
                customer_id: row.customer_id,
                customer_name: names.get(&row.customer_id).cloned().unwrap_or_default(),
                sales_partner_id: row.sales_partner_id,
                commission_rate: row.commission_rate,
                scheduled_datetime: row.scheduled_datetime,
                auto_invoice: row.auto_invoice,
                workflow_state: row.workflow_state.parse()?,
                docstatus: row.docstatus,
                grand_total: row.grand_total,
                items: items.into_iter().map(DeliveryNoteItem::from).collect(),
            })
        })
        .collect()
}

fn raise_invoice(conn: &mut PgConnection, note: &DeliveryNote) -> Result<Uuid, DomainError> {
    let invoice_id = Uuid::new_v4();
    let total = rounded_total(&note.grand_total);

    diesel::insert_into(sales_invoices::table)
        .values(&NewSalesInvoiceRow {
            id: invoice_id,
            delivery_note_id: note.id,
            customer_id: note.customer_id,
            is_pos: true,
            grand_total: note.grand_total.clone(),
            rounded_total: total.clone(),
            docstatus: DOCSTATUS_SUBMITTED,
        })
        .execute(conn)?;

    diesel::insert_into(invoice_payments::table)
        .values(&NewInvoicePaymentRow {
            id: Uuid::new_v4(),
            invoice_id,
            mode_of_payment: MODE_OF_PAYMENT_CASH.to_string(),
            amount: total,
        })
        .execute(conn)?;

    log::info!("raised invoice {} for delivery note {}", invoice_id, note.id);
    Ok(invoice_id)
}

impl DeliveryRepository for DieselDeliveryRepository {
    fn create_for_assignments(
        &self,
        order_id: Uuid,
        groups: Vec<AssignmentGroup>,
    ) -> Result<Vec<Uuid>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Row lock serialises assignments of the same order, so the held
            // set below is read after any concurrent assignment commits.
            let customer_id: Uuid = sales_orders::table
                .find(order_id)
                .select(sales_orders::customer_id)
                .for_update()
                .first(conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Sales Order"))?;

            let held: HashSet<Uuid> = held_lines(conn, order_id)?.into_iter().collect();
            let lines: HashMap<Uuid, OrderLineView> = sales_order_items::table
                .filter(sales_order_items::order_id.eq(order_id))
                .select(SalesOrderItemRow::as_select())
                .load(conn)?
                .into_iter()
                .map(|r| (r.id, OrderLineView::from(r)))
                .collect();

            let mut claimed: HashSet<Uuid> = HashSet::new();
            let mut created = Vec::with_capacity(groups.len());

            for group in groups {
                let commission_rate: BigDecimal = sales_partners::table
                    .find(group.sales_partner)
                    .select(sales_partners::commission_rate)
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| {
                        DomainError::InvalidInput(format!(
                            "Sales partner {} does not exist",
                            group.sales_partner
                        ))
                    })?;

                let note_id = Uuid::new_v4();
                let mut note_items = Vec::with_capacity(group.so_details.len());
                for (so_detail, idx) in group.so_details.iter().zip(0..) {
                    let line = lines.get(so_detail).ok_or_else(|| {
                        DomainError::InvalidInput(format!(
                            "Order line {so_detail} does not belong to order {order_id}"
                        ))
                    })?;
                    if held.contains(so_detail)
                        || line.is_fully_delivered()
                        || !claimed.insert(*so_detail)
                    {
                        return Err(DomainError::Conflict(format!(
                            "Order line {so_detail} is already assigned"
                        )));
                    }

                    let qty = line.qty - line.delivered_qty;
                    note_items.push(NewDeliveryNoteItemRow {
                        id: Uuid::new_v4(),
                        delivery_note_id: note_id,
                        so_detail: line.id,
                        idx,
                        item_code: line.item_code.clone(),
                        item_name: line.item_name.clone(),
                        qty,
                        rate: line.rate.clone(),
                        amount: &line.rate * BigDecimal::from(qty),
                    });
                }

                let grand_total: BigDecimal = note_items.iter().map(|i| &i.amount).sum();
                let pending = WorkflowState::Pending;
                diesel::insert_into(delivery_notes::table)
                    .values(&NewDeliveryNoteRow {
                        id: note_id,
                        sales_order_id: order_id,
                        customer_id,
                        sales_partner_id: group.sales_partner,
                        commission_rate,
                        scheduled_datetime: group.scheduled_datetime,
                        auto_invoice: true,
                        workflow_state: pending.as_str().to_string(),
                        docstatus: pending.docstatus(),
                        grand_total,
                    })
                    .execute(conn)?;
                diesel::insert_into(delivery_note_items::table)
                    .values(&note_items)
                    .execute(conn)?;

                log::info!(
                    "assigned {} line(s) of order {} to partner {} as delivery note {}",
                    note_items.len(),
                    order_id,
                    group.sales_partner,
                    note_id
                );
                created.push(note_id);
            }

            Ok(created)
        })
    }

    fn list_for_partner(
        &self,
        partner_id: Uuid,
        state: Option<WorkflowState>,
        pagination: Pagination,
    ) -> Result<Page<DeliveryNote>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = notes_of_partner(partner_id, state).count().get_result(conn)?;

            let rows = notes_of_partner(partner_id, state)
                .select(DeliveryNoteRow::as_select())
                .order((
                    delivery_notes::scheduled_datetime.asc(),
                    delivery_notes::id.asc(),
                ))
                .limit(pagination.page_length)
                .offset(pagination.offset())
                .load(conn)?;

            Ok(Page {
                items: hydrate(conn, rows)?,
                total,
                pagination,
            })
        })
    }

    fn transition(
        &self,
        note_id: Uuid,
        partner_id: Uuid,
        action: WorkflowAction,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = delivery_notes::table
                .find(note_id)
                .select(DeliveryNoteRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Delivery Note"))?;

            if current.sales_partner_id != partner_id {
                return Err(DomainError::Forbidden(
                    "Not permitted to update this delivery".to_string(),
                ));
            }

            let previous_state: WorkflowState = current.workflow_state.parse()?;
            let next = previous_state.apply(action)?;

            let updated = diesel::update(delivery_notes::table.find(note_id))
                .set((
                    delivery_notes::workflow_state.eq(next.as_str()),
                    delivery_notes::docstatus.eq(next.docstatus()),
                    delivery_notes::updated_at.eq(diesel::dsl::now),
                ))
                .returning(DeliveryNoteRow::as_returning())
                .get_result(conn)?;

            let note = hydrate(conn, vec![updated])?
                .pop()
                .ok_or_else(|| DomainError::Internal("delivery note vanished".to_string()))?;

            if next == WorkflowState::Completed {
                for item in &note.items {
                    diesel::update(sales_order_items::table.find(item.so_detail))
                        .set(
                            sales_order_items::delivered_qty
                                .eq(sales_order_items::delivered_qty + item.qty),
                        )
                        .execute(conn)?;
                }
            }

            let invoice_id = if should_invoice(&note, next) {
                Some(raise_invoice(conn, &note)?)
            } else {
                None
            };

            let customer_fcm_token: Option<String> = customers::table
                .find(note.customer_id)
                .select(customers::fcm_token)
                .first(conn)?;
            let (partner_name, partner_fcm_token): (String, Option<String>) =
                sales_partners::table
                    .find(partner_id)
                    .select((sales_partners::partner_name, sales_partners::fcm_token))
                    .first(conn)?;

            log::info!(
                "delivery note {} moved {} -> {} by partner {}",
                note.id,
                previous_state,
                next,
                partner_id
            );

            Ok(TransitionOutcome {
                note,
                previous_state,
                invoice_id,
                customer_fcm_token,
                partner_name,
                partner_fcm_token,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselDeliveryRepository;
    use crate::db::DbPool;
    use crate::domain::delivery::{AssignmentGroup, WorkflowAction, WorkflowState};
    use crate::domain::errors::DomainError;
    use crate::domain::order::{NewSalesOrder, PricedLine};
    use crate::domain::pagination::Pagination;
    use crate::domain::partner::NewSalesPartner;
    use crate::domain::ports::{DeliveryRepository, OrderRepository, PartnerRepository};
    use crate::infrastructure::models::SalesInvoiceRow;
    use crate::infrastructure::order_repo::DieselOrderRepository;
    use crate::infrastructure::partner_repo::DieselPartnerRepository;
    use crate::infrastructure::test_support::{
        dec, seed_customer, seed_group, seed_item, setup_db,
    };
    use crate::schema::{delivery_note_items, invoice_payments, sales_invoices};

    struct Fixture {
        order_id: Uuid,
        lines: Vec<Uuid>,
        partner_id: Uuid,
        other_partner_id: Uuid,
    }

    fn seed(pool: &DbPool) -> Fixture {
        seed_group(pool, "Services", None, 1, true);
        seed_item(pool, "SVC-0", "Services", "svc/0");
        let customer_id = seed_customer(pool, "uid-customer");

        let orders = DieselOrderRepository::new(pool.clone());
        let order_id = orders
            .create(NewSalesOrder {
                customer_id,
                lines: (0..3)
                    .map(|_| PricedLine {
                        item_code: "SVC-0".to_string(),
                        item_name: "Service".to_string(),
                        qty: 1,
                        rate: dec("99.75"),
                    })
                    .collect(),
                delivery_date: None,
                delivery_time: None,
                address_id: None,
            })
            .expect("order");
        let lines = orders.assignable_lines(order_id).expect("lines");

        let partners = DieselPartnerRepository::new(pool.clone());
        let partner_id = partners
            .create(NewSalesPartner {
                partner_name: "Vikram".to_string(),
                commission_rate: dec("5.00"),
            })
            .expect("partner")
            .id;
        let other_partner_id = partners
            .create(NewSalesPartner {
                partner_name: "Anil".to_string(),
                commission_rate: dec("4.00"),
            })
            .expect("partner")
            .id;

        Fixture {
            order_id,
            lines,
            partner_id,
            other_partner_id,
        }
    }

    fn group(partner: Uuid, hour: u32, lines: &[Uuid]) -> AssignmentGroup {
        AssignmentGroup {
            sales_partner: partner,
            scheduled_datetime: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            so_details: lines.to_vec(),
        }
    }

    #[tokio::test]
    async fn assigned_lines_leave_the_assignable_set() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let repo = DieselDeliveryRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);

        let ids = repo
            .create_for_assignments(
                f.order_id,
                vec![
                    group(f.partner_id, 10, &f.lines[..2]),
                    group(f.other_partner_id, 14, &f.lines[2..]),
                ],
            )
            .expect("assign");
        assert_eq!(ids.len(), 2);
        assert!(orders.assignable_lines(f.order_id).expect("lines").is_empty());

        let page = repo
            .list_for_partner(f.partner_id, None, Pagination::new(1, 20))
            .expect("list");
        assert_eq!(page.total, 1);
        let note = &page.items[0];
        let so_details: Vec<Uuid> = note.items.iter().map(|i| i.so_detail).collect();
        assert_eq!(so_details, f.lines[..2].to_vec());
        assert_eq!(note.grand_total, dec("199.50"));
        assert_eq!(note.commission_rate, dec("5.00"));
        assert_eq!(note.customer_name, "uid-customer");
        assert_eq!(note.workflow_state, WorkflowState::Pending);
        assert!(note.auto_invoice);
    }

    #[tokio::test]
    async fn lines_cannot_be_assigned_twice_or_from_another_order() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let repo = DieselDeliveryRepository::new(pool);

        repo.create_for_assignments(f.order_id, vec![group(f.partner_id, 10, &f.lines[..1])])
            .expect("assign");

        let err = repo
            .create_for_assignments(f.order_id, vec![group(f.partner_id, 11, &f.lines[..1])])
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = repo
            .create_for_assignments(f.order_id, vec![group(f.partner_id, 11, &[Uuid::new_v4()])])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn concurrent_assignments_of_one_line_let_only_one_through() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let line = f.lines[0];

        let handles: Vec<_> = [f.partner_id, f.other_partner_id]
            .into_iter()
            .enumerate()
            .map(|(i, partner)| {
                let repo = DieselDeliveryRepository::new(pool.clone());
                let order_id = f.order_id;
                std::thread::spawn(move || {
                    repo.create_for_assignments(
                        order_id,
                        vec![group(partner, 10 + i as u32, &[line])],
                    )
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("assignment thread"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
                .count(),
            1
        );

        let mut conn = pool.get().expect("conn");
        let notes_for_line: i64 = delivery_note_items::table
            .filter(delivery_note_items::so_detail.eq(line))
            .count()
            .get_result(&mut conn)
            .expect("count");
        assert_eq!(notes_for_line, 1);
    }

    #[tokio::test]
    async fn completing_submits_and_raises_a_cash_invoice() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let repo = DieselDeliveryRepository::new(pool.clone());

        let note_id = repo
            .create_for_assignments(f.order_id, vec![group(f.partner_id, 10, &f.lines[..2])])
            .expect("assign")[0];

        let outcome = repo
            .transition(note_id, f.partner_id, WorkflowAction::Complete)
            .expect("complete");
        assert_eq!(outcome.previous_state, WorkflowState::Pending);
        assert_eq!(outcome.note.workflow_state, WorkflowState::Completed);
        assert_eq!(outcome.note.docstatus, 1);
        assert_eq!(outcome.partner_name, "Vikram");

        let invoice_id = outcome.invoice_id.expect("invoice raised");
        let mut conn = pool.get().expect("conn");
        let invoice = sales_invoices::table
            .find(invoice_id)
            .select(SalesInvoiceRow::as_select())
            .first(&mut conn)
            .expect("invoice row");
        assert!(invoice.is_pos);
        assert_eq!(invoice.rounded_total, dec("200"));
        let paid: Vec<(String, bigdecimal::BigDecimal)> = invoice_payments::table
            .filter(invoice_payments::invoice_id.eq(invoice_id))
            .select((invoice_payments::mode_of_payment, invoice_payments::amount))
            .load(&mut conn)
            .expect("payments");
        assert_eq!(paid, vec![("Cash".to_string(), dec("200"))]);

        let err = repo
            .transition(note_id, f.partner_id, WorkflowAction::Cancel)
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn only_the_assigned_partner_may_transition() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let repo = DieselDeliveryRepository::new(pool);
        let note_id = repo
            .create_for_assignments(f.order_id, vec![group(f.partner_id, 10, &f.lines[..1])])
            .expect("assign")[0];

        let err = repo
            .transition(note_id, f.other_partner_id, WorkflowAction::Complete)
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = repo
            .transition(Uuid::new_v4(), f.partner_id, WorkflowAction::Complete)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn cancelling_frees_the_lines_and_filters_by_state() {
        let (_container, pool) = setup_db().await;
        let f = seed(&pool);
        let repo = DieselDeliveryRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);
        let note_id = repo
            .create_for_assignments(f.order_id, vec![group(f.partner_id, 10, &f.lines)])
            .expect("assign")[0];

        let outcome = repo
            .transition(note_id, f.partner_id, WorkflowAction::Cancel)
            .expect("cancel");
        assert_eq!(outcome.note.docstatus, 2);
        assert!(outcome.invoice_id.is_none());
        assert_eq!(orders.assignable_lines(f.order_id).expect("lines").len(), 3);

        let pending = repo
            .list_for_partner(f.partner_id, Some(WorkflowState::Pending), Pagination::new(1, 20))
            .expect("pending");
        let cancelled = repo
            .list_for_partner(f.partner_id, Some(WorkflowState::Cancelled), Pagination::new(1, 20))
            .expect("cancelled");
        assert_eq!(pending.total, 0);
        assert_eq!(cancelled.total, 1);
        assert_eq!(cancelled.items[0].items.len(), 3);
    }
}
