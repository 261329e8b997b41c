// src/db/memory.rs
//
// Implementação em memória de todos os stores. Usada pelos testes de integração
// e para rodar a API localmente sem Postgres. Mesmas regras dos repositórios:
// folio por contador anual, unicidade de folio e username, LEFT JOIN do cliente.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, listing::PageRequest},
    db::store::{ClientStore, CompanyStore, OrderStore, UserStore},
    models::{
        auth::User,
        client::{Client, ClientFilter, ClientPayload, NewClient},
        company::{Company, UpdateCompanyPayload},
        order::{ClientSummary, NewOrder, Order, OrderChanges, OrderDetail, OrderFilter, OrderStatus},
    },
    services::ledger,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Vec preserva a ordem de inserção (desempate da ordenação por created_at)
    clients: Vec<Client>,
    orders: Vec<Order>,
    company: Option<Company>,
    folio_counters: HashMap<i32, i64>,
}

impl Tables {
    fn detail(&self, order: &Order) -> OrderDetail {
        let cliente = self
            .clients
            .iter()
            .find(|c| c.id == order.client_id)
            .map(|c| ClientSummary {
                id: c.id,
                name: c.name.clone(),
                tax_id: c.tax_id.clone(),
            });
        OrderDetail { order: order.clone(), cliente }
    }

    fn next_folio(&mut self, year: i32) -> String {
        let prefix = ledger::folio_prefix(year);
        let existing = self.orders.iter().filter(|o| o.folio.starts_with(&prefix)).count() as i64;
        let sequence = self
            .folio_counters
            .entry(year)
            .and_modify(|last| *last += 1)
            .or_insert(existing + 1);
        ledger::format_folio(year, *sequence)
    }
}

/// Mais novos primeiro; empate de created_at = o inserido por último vem antes.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = rows.iter().rev().cloned().collect();
    sorted.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    sorted
}

fn page_of<T>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
        .collect()
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|e| AppError::InternalServerError(anyhow!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|e| AppError::InternalServerError(anyhow!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!("El usuario '{username}' ya existe.")));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn list(&self, filter: &ClientFilter, page: PageRequest) -> Result<(Vec<Client>, i64), AppError> {
        let tables = self.read()?;
        let matching: Vec<Client> = tables
            .clients
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let sorted = newest_first(&matching, |c| c.created_at);
        Ok((page_of(sorted, page), total))
    }

    async fn list_active_summaries(&self) -> Result<Vec<ClientSummary>, AppError> {
        let tables = self.read()?;
        let mut summaries: Vec<ClientSummary> = tables
            .clients
            .iter()
            .filter(|c| c.active)
            .map(|c| ClientSummary {
                id: c.id,
                name: c.name.clone(),
                tax_id: c.tax_id.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let tables = self.read()?;
        Ok(tables.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, client: NewClient) -> Result<Client, AppError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let created = Client {
            id: Uuid::new_v4(),
            name: client.name,
            tax_id: client.tax_id,
            tax_condition: client.tax_condition,
            fiscal_address: client.fiscal_address,
            city: client.city,
            province: client.province,
            postal_code: client.postal_code,
            email: client.email,
            phone: client.phone,
            contact: client.contact,
            carrier: client.carrier,
            notes: client.notes,
            active: true,
            created_at: now,
            updated_at: now,
        };
        tables.clients.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &ClientPayload) -> Result<Option<Client>, AppError> {
        let mut tables = self.write()?;
        let Some(client) = tables.clients.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        changes.apply_to(client);
        client.updated_at = Utc::now();
        Ok(Some(client.clone()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Client>, AppError> {
        let mut tables = self.write()?;
        let Some(client) = tables.clients.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        client.active = active;
        client.updated_at = Utc::now();
        Ok(Some(client.clone()))
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables.clients.iter().filter(|c| c.active).count() as i64)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, year: i32, order: NewOrder) -> Result<Order, AppError> {
        let mut tables = self.write()?;
        let folio = tables.next_folio(year);
        if tables.orders.iter().any(|o| o.folio == folio) {
            return Err(AppError::Conflict(format!("El folio {folio} ya existe.")));
        }

        let now = Utc::now();
        let created = Order {
            id: Uuid::new_v4(),
            folio,
            client_id: order.client_id,
            ordered_at: order.ordered_at,
            delivery_at: order.delivery_at,
            status: order.status,
            items: order.items,
            total: order.total,
            notes: order.notes,
            active: true,
            created_at: now,
            updated_at: now,
        };
        tables.orders.push(created.clone());
        Ok(created)
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| tables.detail(o)))
    }

    async fn update(&self, id: Uuid, changes: &OrderChanges) -> Result<Option<Order>, AppError> {
        let mut tables = self.write()?;
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        changes.apply_to(order);
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Order>, AppError> {
        let mut tables = self.write()?;
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.active = active;
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<(Vec<OrderDetail>, i64), AppError> {
        let tables = self.read()?;
        let matching: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let details = page_of(newest_first(&matching, |o| o.created_at), page)
            .iter()
            .map(|o| tables.detail(o))
            .collect();
        Ok((details, total))
    }

    async fn count_in_progress(&self) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.active && !o.status.is_closed())
            .count() as i64)
    }

    async fn count_ordered_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.active && o.ordered_at >= from && o.ordered_at <= to)
            .count() as i64)
    }

    async fn sum_total_between(
        &self,
        status: OrderStatus,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.active && o.status == status && o.ordered_at >= from && o.ordered_at <= to)
            .map(|o| o.total)
            .sum())
    }

    async fn count_by_status(&self) -> Result<BTreeMap<OrderStatus, i64>, AppError> {
        let tables = self.read()?;
        let mut counts = BTreeMap::new();
        for order in tables.orders.iter().filter(|o| o.active) {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<OrderDetail>, AppError> {
        let tables = self.read()?;
        let active: Vec<Order> = tables.orders.iter().filter(|o| o.active).cloned().collect();
        Ok(newest_first(&active, |o| o.created_at)
            .iter()
            .take(limit.max(0) as usize)
            .map(|o| tables.detail(o))
            .collect())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn get_or_init(&self) -> Result<Company, AppError> {
        let mut tables = self.write()?;
        let company = tables
            .company
            .get_or_insert_with(|| Company::with_defaults(Utc::now()));
        Ok(company.clone())
    }

    async fn update(&self, changes: &UpdateCompanyPayload) -> Result<Company, AppError> {
        let mut tables = self.write()?;
        let company = tables
            .company
            .get_or_insert_with(|| Company::with_defaults(Utc::now()));
        changes.apply_to(company);
        company.updated_at = Utc::now();
        Ok(company.clone())
    }
}
