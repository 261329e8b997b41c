// src/db/client_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, listing::PageRequest},
    db::{like_pattern, store::ClientStore},
    models::{
        client::{Client, ClientFilter, ClientPayload, NewClient},
        order::ClientSummary,
    },
};

const CLIENT_COLUMNS: &str = r#"
    id, name, tax_id, tax_condition, fiscal_address, city, province, postal_code,
    email, phone, contact, carrier, notes, active, created_at, updated_at
"#;

// Parâmetros nulos desligam o filtro: $1 = activo, $2 = padrão ILIKE da busca
const CLIENT_FILTER: &str = r#"
    WHERE ($1::boolean IS NULL OR active = $1)
      AND (
        $2::text IS NULL
        OR name ILIKE $2 OR tax_id ILIKE $2 OR email ILIKE $2
        OR contact ILIKE $2 OR city ILIKE $2
      )
"#;

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    name: String,
    tax_id: String,
}

#[async_trait]
impl ClientStore for ClientRepository {
    async fn list(&self, filter: &ClientFilter, page: PageRequest) -> Result<(Vec<Client>, i64), AppError> {
        let active = filter.active.as_option();
        let pattern = filter.search.as_deref().map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM clients {CLIENT_FILTER}");
        let page_sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients {CLIENT_FILTER} \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(active)
            .bind(pattern.as_deref())
            .fetch_one(&self.pool);

        let rows = sqlx::query_as::<_, Client>(&page_sql)
            .bind(active)
            .bind(pattern.as_deref())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool);

        let (total, clients) = tokio::try_join!(count, rows)?;
        Ok((clients, total))
    }

    async fn list_active_summaries(&self) -> Result<Vec<ClientSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, name, tax_id
            FROM clients
            WHERE active = TRUE
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ClientSummary { id: r.id, name: r.name, tax_id: r.tax_id })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn insert(&self, client: NewClient) -> Result<Client, AppError> {
        let sql = format!(
            r#"
            INSERT INTO clients (
                name, tax_id, tax_condition, fiscal_address, city, province,
                postal_code, email, phone, contact, carrier, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {CLIENT_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Client>(&sql)
            .bind(&client.name)
            .bind(&client.tax_id)
            .bind(&client.tax_condition)
            .bind(&client.fiscal_address)
            .bind(&client.city)
            .bind(&client.province)
            .bind(&client.postal_code)
            .bind(&client.email)
            .bind(&client.phone)
            .bind(&client.contact)
            .bind(&client.carrier)
            .bind(&client.notes)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("👤 Cliente '{}' criado ({})", created.name, created.id);
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &ClientPayload) -> Result<Option<Client>, AppError> {
        // COALESCE: campo ausente mantém o valor atual (update parcial em um único statement)
        let sql = format!(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                tax_id = COALESCE($3, tax_id),
                tax_condition = COALESCE($4, tax_condition),
                fiscal_address = COALESCE($5, fiscal_address),
                city = COALESCE($6, city),
                province = COALESCE($7, province),
                postal_code = COALESCE($8, postal_code),
                email = COALESCE($9, email),
                phone = COALESCE($10, phone),
                contact = COALESCE($11, contact),
                carrier = COALESCE($12, carrier),
                notes = COALESCE($13, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.tax_id.as_deref())
            .bind(changes.tax_condition.as_deref())
            .bind(changes.fiscal_address.as_deref())
            .bind(changes.city.as_deref())
            .bind(changes.province.as_deref())
            .bind(changes.postal_code.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.contact.as_deref())
            .bind(changes.carrier.as_deref())
            .bind(changes.notes.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Client>, AppError> {
        let sql = format!(
            "UPDATE clients SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING {CLIENT_COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
