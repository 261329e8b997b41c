// src/db/company_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::CompanyStore,
    models::company::{Company, UpdateCompanyPayload},
};

const COMPANY_COLUMNS: &str = r#"
    name, tax_id, tax_condition, fiscal_address, city, province, postal_code,
    email, phone, contact, notes, created_at, updated_at
"#;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn get_or_init(&self) -> Result<Company, AppError> {
        // Os DEFAULTs da tabela são os padrões da empresa
        let created = sqlx::query("INSERT INTO company DEFAULT VALUES ON CONFLICT (singleton) DO NOTHING")
            .execute(&self.pool)
            .await?;
        if created.rows_affected() > 0 {
            tracing::info!("🏢 Registro da empresa inicializado com os valores padrão");
        }

        let sql = format!("SELECT {COMPANY_COLUMNS} FROM company WHERE singleton = TRUE");
        let company = sqlx::query_as::<_, Company>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(company)
    }

    async fn update(&self, changes: &UpdateCompanyPayload) -> Result<Company, AppError> {
        self.get_or_init().await?;

        let sql = format!(
            r#"
            UPDATE company SET
                name = COALESCE($1, name),
                tax_id = COALESCE($2, tax_id),
                tax_condition = COALESCE($3, tax_condition),
                fiscal_address = COALESCE($4, fiscal_address),
                city = COALESCE($5, city),
                province = COALESCE($6, province),
                postal_code = COALESCE($7, postal_code),
                email = COALESCE($8, email),
                phone = COALESCE($9, phone),
                contact = COALESCE($10, contact),
                notes = COALESCE($11, notes),
                updated_at = NOW()
            WHERE singleton = TRUE
            RETURNING {COMPANY_COLUMNS}
            "#
        );

        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(trimmed(&changes.name))
            .bind(trimmed(&changes.tax_id))
            .bind(trimmed(&changes.tax_condition))
            .bind(trimmed(&changes.fiscal_address))
            .bind(trimmed(&changes.city))
            .bind(trimmed(&changes.province))
            .bind(trimmed(&changes.postal_code))
            .bind(trimmed(&changes.email))
            .bind(trimmed(&changes.phone))
            .bind(trimmed(&changes.contact))
            .bind(trimmed(&changes.notes))
            .fetch_one(&self.pool)
            .await?;
        Ok(company)
    }
}
