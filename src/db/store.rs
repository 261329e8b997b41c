// src/db/store.rs
//
// Contratos de persistência. Os services só conhecem estas traits; o Postgres
// (repos) e a memória (testes / desenvolvimento) são intercambiáveis.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, listing::PageRequest},
    models::{
        auth::User,
        client::{Client, ClientFilter, ClientPayload, NewClient},
        company::{Company, UpdateCompanyPayload},
        order::{ClientSummary, NewOrder, Order, OrderChanges, OrderDetail, OrderFilter, OrderStatus},
    },
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Conflict se o username já existir.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Página de clientes (mais novos primeiro) + total sem paginação.
    async fn list(&self, filter: &ClientFilter, page: PageRequest) -> Result<(Vec<Client>, i64), AppError>;

    /// Ativos, só razão social e CUIT, em ordem alfabética.
    async fn list_active_summaries(&self) -> Result<Vec<ClientSummary>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError>;

    async fn insert(&self, client: NewClient) -> Result<Client, AppError>;

    /// `None` quando o id não existe.
    async fn update(&self, id: Uuid, changes: &ClientPayload) -> Result<Option<Client>, AppError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Client>, AppError>;

    async fn count_active(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atribui o próximo folio de `year` e persiste, atomicamente.
    async fn insert(&self, year: i32, order: NewOrder) -> Result<Order, AppError>;

    async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError>;

    /// Nunca altera o folio. `None` quando o id não existe.
    async fn update(&self, id: Uuid, changes: &OrderChanges) -> Result<Option<Order>, AppError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Order>, AppError>;

    /// Página de pedidos (mais novos primeiro) + total sem paginação.
    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<(Vec<OrderDetail>, i64), AppError>;

    // --- Agregados do dashboard (sempre só pedidos ativos) ---

    /// Ativos com estado fora de {entregado, cobrado, cancelado}.
    async fn count_in_progress(&self) -> Result<i64, AppError>;

    /// Ativos com `fecha_pedido` em [from, to].
    async fn count_ordered_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, AppError>;

    /// Soma dos totais dos ativos em `status` com `fecha_pedido` em [from, to].
    async fn sum_total_between(
        &self,
        status: OrderStatus,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError>;

    /// Estados sem pedidos não aparecem no mapa.
    async fn count_by_status(&self) -> Result<BTreeMap<OrderStatus, i64>, AppError>;

    async fn recent(&self, limit: i64) -> Result<Vec<OrderDetail>, AppError>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Devolve o registro único, criando-o com os padrões se ainda não existir.
    async fn get_or_init(&self) -> Result<Company, AppError>;

    async fn update(&self, changes: &UpdateCompanyPayload) -> Result<Company, AppError>;
}
