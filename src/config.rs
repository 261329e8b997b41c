// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ClientRepository, CompanyRepository, MemoryStore, OrderRepository, UserRepository},
    services::{
        auth::DEFAULT_TOKEN_TTL_HOURS, AuthService, ClientService, CompanyService, OrderService,
    },
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configuração lida do ambiente (.env é carregado antes, se existir)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub token_ttl_hours: i64,
    pub max_connections: u32,
    // Build do front servido pelo próprio backend (modo produção)
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            port: parse_var("PORT", DEFAULT_PORT)?,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.trim().is_empty()),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} inválida: {raw}")),
        _ => Ok(default),
    }
}

pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub order_service: OrderService,
    pub company_service: CompanyService,
}

impl AppState {
    // --- Monta o gráfico de dependências sobre o Postgres ---
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let client_repo = Arc::new(ClientRepository::new(db_pool.clone()));
        let order_repo = Arc::new(OrderRepository::new(db_pool.clone()));
        let company_repo = Arc::new(CompanyRepository::new(db_pool));

        Self {
            auth_service: AuthService::new(user_repo, config.jwt_secret.clone(), config.token_ttl_hours),
            client_service: ClientService::new(client_repo.clone()),
            order_service: OrderService::new(order_repo, client_repo),
            company_service: CompanyService::new(company_repo),
        }
    }

    /// Mesmo gráfico sobre o store em memória (testes e desenvolvimento sem banco).
    pub fn in_memory(jwt_secret: &str) -> Self {
        let store = Arc::new(MemoryStore::new());

        Self {
            auth_service: AuthService::new(store.clone(), jwt_secret.to_string(), DEFAULT_TOKEN_TTL_HOURS)
                .with_bcrypt_cost(4),
            client_service: ClientService::new(store.clone()),
            order_service: OrderService::new(store.clone(), store.clone()),
            company_service: CompanyService::new(store),
        }
    }
}
