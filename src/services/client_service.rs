// src/services/client_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        listing::{ActiveFilter, PageRequest, Paginated},
    },
    db::ClientStore,
    models::{
        client::{Client, ClientFilter, ClientPayload, NewClient},
        order::ClientSummary,
    },
};

#[derive(Clone)]
pub struct ClientService {
    repo: Arc<dyn ClientStore>,
}

impl ClientService {
    pub fn new(repo: Arc<dyn ClientStore>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        active: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Client>, AppError> {
        let filter = ClientFilter {
            search: crate::common::listing::normalize_search(search),
            active: ActiveFilter::parse(active)?,
        };
        let (clients, total) = self.repo.list(&filter, page).await?;
        Ok(Paginated::new(clients, total, page))
    }

    // Para o select do formulário de pedidos
    pub async fn all_active(&self) -> Result<Vec<ClientSummary>, AppError> {
        self.repo.list_active_summaries().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, payload: ClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        let payload = payload.trimmed();

        let name = match payload.name.clone() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(AppError::BadRequest(
                    "La razón social es obligatoria.".to_string(),
                ))
            }
        };

        self.repo.insert(NewClient::from_payload(name, payload)).await
    }

    pub async fn update(&self, id: Uuid, payload: ClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        self.repo
            .update(id, &payload.trimmed())
            .await?
            .ok_or_else(not_found)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<Client, AppError> {
        let client = self.repo.set_active(id, false).await?.ok_or_else(not_found)?;
        tracing::info!("Cliente {} desativado", client.id);
        Ok(client)
    }

    pub async fn reactivate(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo.set_active(id, true).await?.ok_or_else(not_found)
    }

    pub async fn count_active(&self) -> Result<i64, AppError> {
        self.repo.count_active().await
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Cliente no encontrado".to_string())
}
