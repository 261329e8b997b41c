// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{AuthResponse, Claims, User},
};

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserStore>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Custo do bcrypt; os testes usam o mínimo (4) para não pagar o hash caro.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    // Usado pelo seed. Conflict se o username já existir.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self.user_repo.create_user(username, &hashed_password).await?;
        tracing::info!("👤 Usuário '{}' criado", user.username);
        Ok(user)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!("Tentativa de login com senha incorreta para '{}'", username);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, username: user.username })
    }

    // Assinatura, expiração e existência do usuário; qualquer falha vira InvalidToken.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), "segredo-de-teste".into(), 24).with_bcrypt_cost(4)
    }

    #[tokio::test]
    async fn login_issues_a_token_that_validates() {
        let auth = service();
        let user = auth.create_user("bmilumina", "luces2026").await.unwrap();

        let response = auth.login_user("bmilumina", "luces2026").await.unwrap();
        assert_eq!(response.username, "bmilumina");

        let validated = auth.validate_token(&response.token).await.unwrap();
        assert_eq!(validated.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_rejected() {
        let auth = service();
        auth.create_user("bmilumina", "luces2026").await.unwrap();

        assert!(matches!(
            auth.login_user("bmilumina", "otra").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_user("nadie", "luces2026").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn tokens_signed_with_another_secret_are_invalid() {
        let auth = service();
        auth.create_user("bmilumina", "luces2026").await.unwrap();
        let token = auth.login_user("bmilumina", "luces2026").await.unwrap().token;

        let other = AuthService::new(Arc::new(MemoryStore::new()), "outro".into(), 24);
        assert!(matches!(other.validate_token(&token).await, Err(AppError::InvalidToken)));
        assert!(matches!(auth.validate_token("lixo").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_tokens_are_invalid() {
        // TTL negativo: o token já nasce vencido (além da folga padrão de 60s)
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store, "segredo".into(), -2).with_bcrypt_cost(4);
        auth.create_user("bmilumina", "luces2026").await.unwrap();
        let token = auth.login_user("bmilumina", "luces2026").await.unwrap().token;

        assert!(matches!(auth.validate_token(&token).await, Err(AppError::InvalidToken)));
    }
}
