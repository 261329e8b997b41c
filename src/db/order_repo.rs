// src/db/order_repo.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::{map_unique_violation, AppError},
        listing::PageRequest,
    },
    db::{like_pattern, store::OrderStore},
    models::order::{ClientSummary, NewOrder, Order, OrderChanges, OrderDetail, OrderFilter, OrderStatus},
    services::ledger,
};

const ORDER_COLUMNS: &str = r#"
    id, folio, client_id, ordered_at, delivery_at, status, items, total, notes,
    active, created_at, updated_at
"#;

// Pedido + projeção do cliente. LEFT JOIN: o cliente pode ter sumido.
const DETAIL_SELECT: &str = r#"
    SELECT
        o.id, o.folio, o.client_id, o.ordered_at, o.delivery_at, o.status, o.items,
        o.total, o.notes, o.active, o.created_at, o.updated_at,
        c.name AS client_name, c.tax_id AS client_tax_id
    FROM orders o
    LEFT JOIN clients c ON c.id = o.client_id
"#;

// $1 busca, $2 estado, $3 activo, $4 desde, $5 até. NULL desliga cada filtro.
const ORDER_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR o.folio ILIKE $1 OR o.notes ILIKE $1)
      AND ($2::order_status IS NULL OR o.status = $2)
      AND ($3::boolean IS NULL OR o.active = $3)
      AND ($4::timestamptz IS NULL OR o.ordered_at >= $4)
      AND ($5::timestamptz IS NULL OR o.ordered_at <= $5)
"#;

// Próximo número do ano. Na primeira vez do ano o contador parte do que já existe na tabela
// (bases migradas sem contador).
const NEXT_SEQUENCE: &str = r#"
    INSERT INTO folio_counters (year, last_sequence)
    VALUES ($1, (SELECT COUNT(*) FROM orders WHERE folio LIKE $2) + 1)
    ON CONFLICT (year) DO UPDATE SET last_sequence = folio_counters.last_sequence + 1
    RETURNING last_sequence
"#;

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderDetailRow {
    #[sqlx(flatten)]
    order: Order,
    client_name: Option<String>,
    client_tax_id: Option<String>,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(row: OrderDetailRow) -> Self {
        let cliente = row.client_name.map(|name| ClientSummary {
            id: row.order.client_id,
            name,
            tax_id: row.client_tax_id.unwrap_or_default(),
        });
        OrderDetail { order: row.order, cliente }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, year: i32, order: NewOrder) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(NEXT_SEQUENCE)
            .bind(year)
            .bind(format!("{}%", ledger::folio_prefix(year)))
            .fetch_one(&mut *tx)
            .await?;
        let folio = ledger::format_folio(year, sequence);

        let sql = format!(
            r#"
            INSERT INTO orders (folio, client_id, ordered_at, delivery_at, status, items, total, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Order>(&sql)
            .bind(&folio)
            .bind(order.client_id)
            .bind(order.ordered_at)
            .bind(order.delivery_at)
            .bind(order.status)
            .bind(Json(&order.items))
            .bind(order.total)
            .bind(&order.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, || format!("El folio {folio} ya existe.")))?;

        tx.commit().await?;

        tracing::info!("🧾 Pedido {} criado (total {})", created.folio, created.total);
        Ok(created)
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError> {
        let sql = format!("{DETAIL_SELECT} WHERE o.id = $1");
        let row = sqlx::query_as::<_, OrderDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(OrderDetail::from))
    }

    async fn update(&self, id: Uuid, changes: &OrderChanges) -> Result<Option<Order>, AppError> {
        // folio fica fora do SET: nunca é recalculado
        let sql = format!(
            r#"
            UPDATE orders SET
                client_id = COALESCE($2, client_id),
                ordered_at = COALESCE($3, ordered_at),
                delivery_at = CASE WHEN $9 THEN $4 ELSE delivery_at END,
                status = COALESCE($5, status),
                items = COALESCE($6, items),
                total = COALESCE($7, total),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let (items, total) = match &changes.priced_items {
            Some((items, total)) => (Some(Json(items)), Some(*total)),
            None => (None, None),
        };

        let updated = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(changes.client_id)
            .bind(changes.ordered_at)
            .bind(changes.delivery_at.flatten())
            .bind(changes.status)
            .bind(items)
            .bind(total)
            .bind(changes.notes.as_deref())
            .bind(changes.delivery_at.is_some())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Order>, AppError> {
        let sql = format!(
            "UPDATE orders SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<(Vec<OrderDetail>, i64), AppError> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let active = filter.active.as_option();

        let count_sql = format!("SELECT COUNT(*) FROM orders o {ORDER_FILTER}");
        let page_sql = format!(
            "{DETAIL_SELECT} {ORDER_FILTER} ORDER BY o.created_at DESC, o.folio DESC LIMIT $6 OFFSET $7"
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(pattern.as_deref())
            .bind(filter.status)
            .bind(active)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(&self.pool);

        let rows = sqlx::query_as::<_, OrderDetailRow>(&page_sql)
            .bind(pattern.as_deref())
            .bind(filter.status)
            .bind(active)
            .bind(filter.from)
            .bind(filter.to)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool);

        let (total, rows) = tokio::try_join!(count, rows)?;
        Ok((rows.into_iter().map(OrderDetail::from).collect(), total))
    }

    async fn count_in_progress(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE active = TRUE
              AND status NOT IN ('entregado', 'cobrado', 'cancelado')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_ordered_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE active = TRUE AND ordered_at >= $1 AND ordered_at <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn sum_total_between(
        &self,
        status: OrderStatus,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let sum = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total), 0) FROM orders
            WHERE active = TRUE AND status = $1 AND ordered_at >= $2 AND ordered_at <= $3
            "#,
        )
        .bind(status)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    async fn count_by_status(&self) -> Result<BTreeMap<OrderStatus, i64>, AppError> {
        let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
            r#"
            SELECT status, COUNT(*) FROM orders
            WHERE active = TRUE
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<OrderDetail>, AppError> {
        let sql = format!(
            "{DETAIL_SELECT} WHERE o.active = TRUE ORDER BY o.created_at DESC, o.folio DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, OrderDetailRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }
}
