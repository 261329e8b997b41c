// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::{
    extract::WithRejection,
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{AuthResponse, LoginUserPayload, VerifyResponse},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginUserPayload>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(response))
}

// GET /api/auth/verify
// Pública: responde {valid} em vez do erro padrão, o front só olha o booleano.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido", body = VerifyResponse),
        (status = 401, description = "Token ausente, inválido ou expirado", body = VerifyResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn verify(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> impl IntoResponse {
    let Ok(TypedHeader(Authorization(bearer))) = bearer else {
        return (StatusCode::UNAUTHORIZED, Json(VerifyResponse { valid: false }));
    };

    match app_state.auth_service.validate_token(bearer.token()).await {
        Ok(_) => (StatusCode::OK, Json(VerifyResponse { valid: true })),
        Err(_) => (StatusCode::UNAUTHORIZED, Json(VerifyResponse { valid: false })),
    }
}
