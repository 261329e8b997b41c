// src/services/company_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    db::CompanyStore,
    models::company::{Company, UpdateCompanyPayload},
};

#[derive(Clone)]
pub struct CompanyService {
    repo: Arc<dyn CompanyStore>,
}

impl CompanyService {
    pub fn new(repo: Arc<dyn CompanyStore>) -> Self {
        Self { repo }
    }

    // Primeira leitura cria o registro com os padrões
    pub async fn get(&self) -> Result<Company, AppError> {
        self.repo.get_or_init().await
    }

    pub async fn update(&self, payload: UpdateCompanyPayload) -> Result<Company, AppError> {
        payload.validate()?;
        let company = self.repo.update(&payload).await?;
        tracing::info!("🏢 Dados da empresa atualizados");
        Ok(company)
    }
}
