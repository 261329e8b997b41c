// src/handlers/company.rs

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::WithRejection;

use crate::{
    common::error::AppError,
    config::AppState,
    models::company::{Company, UpdateCompanyPayload},
};

// GET /api/empresa
#[utoipa::path(
    get,
    path = "/api/empresa",
    tag = "Empresa",
    responses(
        (status = 200, description = "Dados da empresa (criados com os padrões na primeira leitura)", body = Company)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.get().await?;
    Ok(Json(company))
}

// PUT /api/empresa
#[utoipa::path(
    put,
    path = "/api/empresa",
    tag = "Empresa",
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Dados da empresa atualizados", body = Company),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCompanyPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.update(payload).await?;
    Ok(Json(company))
}
