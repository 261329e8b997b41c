// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{error::AppError, listing::PageRequest},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        client::{Client, ClientPayload},
        order::ClientSummary,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientListQuery {
    /// Busca em razão social, CUIT, e-mail, contato e localidade
    pub search: Option<String>,
    /// `true`, `false` ou vazio (todos)
    pub activo: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientActionResponse {
    #[schema(example = "Cliente desactivado")]
    pub message: String,
    pub cliente: Client,
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ClientListQuery),
    responses(
        (status = 200, description = "Página de clientes", body = crate::common::listing::Paginated<Client>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ClientListQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit);
    let clients = app_state
        .client_service
        .list(query.search.as_deref(), query.activo.as_deref(), page)
        .await?;
    Ok(Json(clients))
}

// GET /api/clientes/all
#[utoipa::path(
    get,
    path = "/api/clientes/all",
    tag = "Clientes",
    responses(
        (status = 200, description = "Clientes ativos (para selects)", body = Vec<ClientSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_active(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.all_active().await?;
    Ok(Json(clients))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get(id).await?;
    Ok(Json(client))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<ClientPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.create(payload).await?;
    tracing::debug!(user = %user.username, "cliente {} cadastrado", client.id);
    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ClientPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.update(id, payload).await?;
    Ok(Json(client))
}

// DELETE /api/clientes/{id} (soft delete)
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente desativado", body = ClientActionResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.client_service.deactivate(id).await?;
    tracing::debug!(user = %user.username, "cliente {} desativado", cliente.id);
    Ok(Json(ClientActionResponse {
        message: "Cliente desactivado".to_string(),
        cliente,
    }))
}

// PATCH /api/clientes/{id}/reactivar
#[utoipa::path(
    patch,
    path = "/api/clientes/{id}/reactivar",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente reativado", body = ClientActionResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reactivate_client(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.client_service.reactivate(id).await?;
    Ok(Json(ClientActionResponse {
        message: "Cliente reactivado".to_string(),
        cliente,
    }))
}
