// src/handlers/orders.rs

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
    models::order::{CreateOrderPayload, OrderDetail, OrderStats, UpdateOrderPayload},
    services::order_service::OrderListQuery,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    /// Busca no folio e nas notas
    pub search: Option<String>,
    /// Estado exato, ou `todos`
    pub estado: Option<String>,
    /// `true`, `false` ou vazio (todos)
    pub activo: Option<String>,
    /// YYYY-MM-DD, inclusivo desde 00:00:00
    pub fecha_desde: Option<String>,
    /// YYYY-MM-DD, inclusivo até 23:59:59
    pub fecha_hasta: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderActionResponse {
    #[schema(example = "Pedido desactivado")]
    pub message: String,
    pub pedido: OrderDetail,
}

// GET /api/pedidos
#[utoipa::path(
    get,
    path = "/api/pedidos",
    tag = "Pedidos",
    params(OrderQuery),
    responses(
        (status = 200, description = "Página de pedidos", body = crate::common::listing::Paginated<OrderDetail>),
        (status = 400, description = "Filtro inválido"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<OrderQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit);
    let filters = OrderListQuery {
        search: query.search.as_deref(),
        status: query.estado.as_deref(),
        active: query.activo.as_deref(),
        from: query.fecha_desde.as_deref(),
        to: query.fecha_hasta.as_deref(),
    };

    let orders = app_state.order_service.list(filters, page).await?;
    Ok(Json(orders))
}

// GET /api/pedidos/stats
#[utoipa::path(
    get,
    path = "/api/pedidos/stats",
    tag = "Pedidos",
    responses(
        (status = 200, description = "Resumo do dashboard", body = OrderStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.order_service.stats().await?;
    Ok(Json(stats))
}

// GET /api/pedidos/{id}
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com o cliente", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get(id).await?;
    Ok(Json(order))
}

// POST /api/pedidos
#[utoipa::path(
    post,
    path = "/api/pedidos",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com folio atribuído", body = OrderDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Folio duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateOrderPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.create(payload).await?;
    tracing::debug!(user = %user.username, "pedido {} registrado", order.order.folio);
    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /api/pedidos/{id}
#[utoipa::path(
    put,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = OrderDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateOrderPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.update(id, payload).await?;
    Ok(Json(order))
}

// DELETE /api/pedidos/{id} (soft delete)
#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido desativado", body = OrderActionResponse),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let pedido = app_state.order_service.deactivate(id).await?;
    tracing::debug!(user = %user.username, "pedido {} desativado", pedido.order.folio);
    Ok(Json(OrderActionResponse {
        message: "Pedido desactivado".to_string(),
        pedido,
    }))
}

// PATCH /api/pedidos/{id}/reactivar
#[utoipa::path(
    patch,
    path = "/api/pedidos/{id}/reactivar",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido reativado", body = OrderActionResponse),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reactivate_order(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let pedido = app_state.order_service.reactivate(id).await?;
    Ok(Json(OrderActionResponse {
        message: "Pedido reactivado".to_string(),
        pedido,
    }))
}
