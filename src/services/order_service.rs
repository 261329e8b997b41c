// src/services/order_service.rs

use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        listing::{normalize_search, ActiveFilter, PageRequest, Paginated},
    },
    db::{ClientStore, OrderStore},
    models::{
        dates,
        order::{
            CreateOrderPayload, NewOrder, OrderChanges, OrderDetail, OrderFilter, OrderStats, OrderStatus,
            UpdateOrderPayload,
        },
    },
    services::ledger,
};

/// Quantos pedidos aparecem em "recientes" no dashboard.
pub const RECENT_ORDERS: i64 = 5;

/// Filtros crus da query string de `GET /pedidos`.
#[derive(Debug, Default, Clone)]
pub struct OrderListQuery<'a> {
    pub search: Option<&'a str>,
    pub status: Option<&'a str>,
    pub active: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: Arc<dyn OrderStore>,
    client_repo: Arc<dyn ClientStore>,
}

impl OrderService {
    pub fn new(order_repo: Arc<dyn OrderStore>, client_repo: Arc<dyn ClientStore>) -> Self {
        Self { order_repo, client_repo }
    }

    pub async fn create(&self, payload: CreateOrderPayload) -> Result<OrderDetail, AppError> {
        payload.validate()?;
        let client_id = payload
            .client_id
            .ok_or_else(|| AppError::BadRequest("El cliente es obligatorio.".to_string()))?;

        let (items, total) = ledger::price_items(&payload.items)?;

        // O ano do folio é o do relógio local do servidor, não o de fecha_pedido
        let year = Local::now().year();
        let order = NewOrder {
            client_id,
            ordered_at: payload.ordered_at.unwrap_or_else(Utc::now),
            delivery_at: payload.delivery_at,
            status: payload.status.unwrap_or_default(),
            items,
            total,
            notes: payload.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
        };

        let created = self.order_repo.insert(year, order).await?;
        self.get(created.id).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateOrderPayload) -> Result<OrderDetail, AppError> {
        payload.validate()?;

        let priced_items = match &payload.items {
            Some(inputs) => Some(ledger::price_items(inputs)?),
            None => None,
        };

        let changes = OrderChanges {
            client_id: payload.client_id,
            ordered_at: payload.ordered_at,
            delivery_at: payload.delivery_at,
            status: payload.status,
            priced_items,
            notes: payload.notes.map(|n| n.trim().to_string()),
        };

        let updated = self.order_repo.update(id, &changes).await?.ok_or_else(not_found)?;
        self.get(updated.id).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self.order_repo.set_active(id, false).await?.ok_or_else(not_found)?;
        tracing::info!("Pedido {} desativado", order.folio);
        self.get(order.id).await
    }

    pub async fn reactivate(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self.order_repo.set_active(id, true).await?.ok_or_else(not_found)?;
        self.get(order.id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        self.order_repo.find_detail(id).await?.ok_or_else(not_found)
    }

    pub async fn list(&self, query: OrderListQuery<'_>, page: PageRequest) -> Result<Paginated<OrderDetail>, AppError> {
        let from = dates::parse_day("fecha_desde", query.from)?;
        let to = dates::parse_day("fecha_hasta", query.to)?;

        let filter = OrderFilter {
            search: normalize_search(query.search),
            status: OrderStatus::parse_filter(query.status)?,
            active: ActiveFilter::parse(query.active)?,
            from: from.and_then(|d| dates::start_of_day(&Local, d)),
            to: to.and_then(|d| dates::end_of_day(&Local, d)),
        };

        let (orders, total) = self.order_repo.list(&filter, page).await?;
        Ok(Paginated::new(orders, total, page))
    }

    pub async fn stats(&self) -> Result<OrderStats, AppError> {
        self.stats_at(&Local::now()).await
    }

    /// Estatísticas do dashboard com o "agora" explícito (mês corrente de `now`).
    pub async fn stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<OrderStats, AppError> {
        let (month_start, month_end) = ledger::month_bounds(now)?;

        let (active_clients, orders_in_progress, orders_this_month, revenue_this_month, by_status, recent) =
            tokio::try_join!(
                self.client_repo.count_active(),
                self.order_repo.count_in_progress(),
                self.order_repo.count_ordered_between(month_start, month_end),
                self.order_repo
                    .sum_total_between(OrderStatus::Cobrado, month_start, month_end),
                self.order_repo.count_by_status(),
                self.order_repo.recent(RECENT_ORDERS),
            )?;

        Ok(OrderStats {
            active_clients,
            orders_in_progress,
            orders_this_month,
            revenue_this_month,
            by_status,
            recent,
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Pedido no encontrado".to_string())
}
