use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::delivery::{WorkflowState, DOCSTATUS_CANCELLED};
use crate::domain::errors::DomainError;
use crate::domain::grouping::group_children;
use crate::domain::order::{
    NewSalesOrder, OrderLineView, OrderView, ORDER_TYPE_SHOPPING_CART, STATUS_TO_DELIVER_AND_BILL,
};
use crate::domain::pagination::{Page, Pagination};
use crate::domain::ports::OrderRepository;
use crate::schema::{delivery_note_items, delivery_notes, sales_order_items, sales_orders};

use super::models::{NewSalesOrderItemRow, NewSalesOrderRow, SalesOrderItemRow, SalesOrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn orders_of_customer(customer_id: Uuid) -> sales_orders::BoxedQuery<'static, Pg> {
    sales_orders::table
        .filter(sales_orders::customer_id.eq(customer_id))
        .into_boxed()
}

/// Loads the lines of `orders` and hangs them under their order.
pub(crate) fn attach_lines(
    conn: &mut PgConnection,
    orders: Vec<SalesOrderRow>,
) -> QueryResult<Vec<OrderView>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let lines = sales_order_items::table
        .filter(sales_order_items::order_id.eq_any(ids))
        .order((sales_order_items::idx.asc(), sales_order_items::id.asc()))
        .select(SalesOrderItemRow::as_select())
        .load(conn)?;

    let (grouped, _) = group_children(orders, lines, |o| o.id, |l| l.order_id);
    Ok(grouped
        .into_iter()
        .map(|(order, lines)| order.into_view(lines.into_iter().map(OrderLineView::from).collect()))
        .collect())
}

/// Ids of order lines already held by a pending or completed delivery note.
pub(crate) fn held_lines(conn: &mut PgConnection, order_id: Uuid) -> QueryResult<Vec<Uuid>> {
    let live_states: Vec<&str> = WorkflowState::ALL
        .iter()
        .filter(|s| s.holds_lines())
        .map(|s| s.as_str())
        .collect();

    delivery_note_items::table
        .inner_join(delivery_notes::table)
        .filter(delivery_notes::sales_order_id.eq(order_id))
        .filter(delivery_notes::docstatus.lt(DOCSTATUS_CANCELLED))
        .filter(delivery_notes::workflow_state.eq_any(live_states))
        .select(delivery_note_items::so_detail)
        .load(conn)
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewSalesOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order_id = Uuid::new_v4();
            diesel::insert_into(sales_orders::table)
                .values(&NewSalesOrderRow {
                    id: order_id,
                    customer_id: order.customer_id,
                    order_type: ORDER_TYPE_SHOPPING_CART.to_string(),
                    status: STATUS_TO_DELIVER_AND_BILL.to_string(),
                    transaction_date: Utc::now().date_naive(),
                    delivery_date: order.delivery_date,
                    delivery_time: order.delivery_time,
                    address_id: order.address_id,
                    grand_total: order.grand_total(),
                })
                .execute(conn)?;

            // 2. Insert order lines, keeping cart order in `idx`
            let new_lines: Vec<NewSalesOrderItemRow> = order
                .lines
                .iter()
                .zip(0..)
                .map(|(l, idx)| NewSalesOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    idx,
                    item_code: l.item_code.clone(),
                    item_name: l.item_name.clone(),
                    qty: l.qty,
                    rate: l.rate.clone(),
                    amount: l.amount(),
                })
                .collect();
            diesel::insert_into(sales_order_items::table)
                .values(&new_lines)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = sales_orders::table
            .filter(sales_orders::id.eq(id))
            .select(SalesOrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(attach_lines(&mut conn, vec![order])?.pop())
    }

    fn list_for_customer(
        &self,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders_of_customer(customer_id).count().get_result(conn)?;

            let rows = orders_of_customer(customer_id)
                .select(SalesOrderRow::as_select())
                .order((sales_orders::created_at.desc(), sales_orders::id.asc()))
                .limit(pagination.page_length)
                .offset(pagination.offset())
                .load(conn)?;

            Ok(Page {
                items: attach_lines(conn, rows)?,
                total,
                pagination,
            })
        })
    }

    fn assignable_lines(&self, order_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let held = held_lines(conn, order_id)?;
            let lines = sales_order_items::table
                .filter(sales_order_items::order_id.eq(order_id))
                .order((sales_order_items::idx.asc(), sales_order_items::id.asc()))
                .select(SalesOrderItemRow::as_select())
                .load(conn)?;

            Ok(lines
                .into_iter()
                .map(OrderLineView::from)
                .filter(|l| !held.contains(&l.id) && !l.is_fully_delivered())
                .map(|l| l.id)
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::db::DbPool;
    use crate::domain::order::{NewSalesOrder, PricedLine};
    use crate::domain::pagination::Pagination;
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::test_support::{dec, seed_customer, seed_group, seed_item, setup_db};

    fn order(customer_id: Uuid, lines: usize) -> NewSalesOrder {
        NewSalesOrder {
            customer_id,
            lines: (0..lines)
                .map(|i| PricedLine {
                    item_code: format!("SVC-{}", i % 2),
                    item_name: "Service".to_string(),
                    qty: 1,
                    rate: dec("100.00"),
                })
                .collect(),
            delivery_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            delivery_time: None,
            address_id: None,
        }
    }

    fn seed_catalog(pool: &DbPool) {
        seed_group(pool, "Services", None, 1, true);
        seed_item(pool, "SVC-0", "Services", "svc/0");
        seed_item(pool, "SVC-1", "Services", "svc/1");
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        seed_catalog(&pool);
        let customer_id = seed_customer(&pool, "uid-1");
        let repo = DieselOrderRepository::new(pool);

        let order_id = repo.create(order(customer_id, 2)).expect("create failed");
        let found = repo
            .find_by_id(order_id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(found.customer_id, customer_id);
        assert_eq!(found.order_type, "Shopping Cart");
        assert_eq!(found.items.len(), 2);
        assert_eq!(found.grand_total, dec("200.00"));
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        assert!(repo.find_by_id(Uuid::new_v4()).expect("find").is_none());
    }

    #[tokio::test]
    async fn list_paginates_and_groups_every_line_once() {
        let (_container, pool) = setup_db().await;
        seed_catalog(&pool);
        let customer_id = seed_customer(&pool, "uid-1");
        let stranger = seed_customer(&pool, "uid-2");
        let repo = DieselOrderRepository::new(pool);

        for n in 1..=5 {
            repo.create(order(customer_id, n)).expect("create failed");
        }
        repo.create(order(stranger, 3)).expect("create failed");

        let page1 = repo
            .list_for_customer(customer_id, Pagination::new(1, 3))
            .expect("page 1");
        let page2 = repo
            .list_for_customer(customer_id, Pagination::new(2, 3))
            .expect("page 2");

        assert_eq!(page1.total, 5);
        assert_eq!(page2.total, 5);
        assert_eq!(page1.items.len(), 3);
        assert_eq!(page2.items.len(), 2);

        let all: Vec<_> = page1.items.iter().chain(page2.items.iter()).collect();
        let line_count: usize = all.iter().map(|o| o.items.len()).sum();
        assert_eq!(line_count, 1 + 2 + 3 + 4 + 5);
        for o in &all {
            assert!(o.items.iter().all(|l| l.order_id == o.id));
        }
    }

    #[tokio::test]
    async fn lines_come_back_in_cart_order() {
        let (_container, pool) = setup_db().await;
        seed_catalog(&pool);
        let customer_id = seed_customer(&pool, "uid-1");
        let repo = DieselOrderRepository::new(pool);

        let mut cart = order(customer_id, 8);
        for (i, line) in cart.lines.iter_mut().enumerate() {
            line.item_name = format!("Service {i}");
        }
        let expected: Vec<String> = cart.lines.iter().map(|l| l.item_name.clone()).collect();
        let order_id = repo.create(cart).expect("create failed");

        let found = repo.find_by_id(order_id).expect("find").expect("order");
        let names: Vec<String> = found.items.iter().map(|l| l.item_name.clone()).collect();
        assert_eq!(names, expected);

        let assignable = repo.assignable_lines(order_id).expect("lines");
        let ids: Vec<Uuid> = found.items.iter().map(|l| l.id).collect();
        assert_eq!(assignable, ids);

        let listed = repo
            .list_for_customer(customer_id, Pagination::new(1, 10))
            .expect("list");
        let names: Vec<String> = listed.items[0].items.iter().map(|l| l.item_name.clone()).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn all_lines_start_assignable() {
        let (_container, pool) = setup_db().await;
        seed_catalog(&pool);
        let customer_id = seed_customer(&pool, "uid-1");
        let repo = DieselOrderRepository::new(pool);
        let order_id = repo.create(order(customer_id, 3)).expect("create failed");

        assert_eq!(repo.assignable_lines(order_id).expect("lines").len(), 3);
    }
}
