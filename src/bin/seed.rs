// src/bin/seed.rs
//
// Cria o usuário administrador e, com o cadastro vazio, clientes e pedidos de exemplo.
// Os pedidos passam pelo OrderService, então folio e totais seguem as regras normais.

use std::env;

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use bm_backend::{
    common::{error::AppError, listing::PageRequest},
    config::{self, AppState, Config},
    models::{
        client::ClientPayload,
        order::{CreateOrderPayload, OrderItemInput, OrderStatus},
    },
};

const DEFAULT_ADMIN_USERNAME: &str = "bmilumina";

struct SampleClient {
    name: &'static str,
    tax_id: &'static str,
    tax_condition: &'static str,
    address: &'static str,
    city: &'static str,
    postal_code: &'static str,
    email: &'static str,
    phone: &'static str,
    contact: &'static str,
}

const SAMPLE_CLIENTS: [SampleClient; 3] = [
    SampleClient {
        name: "Electricidad López S.R.L.",
        tax_id: "30-71234567-0",
        tax_condition: "Responsable Inscripto",
        address: "Av. Rivadavia 1234",
        city: "Morón",
        postal_code: "1708",
        email: "info@lopezelectricidad.com.ar",
        phone: "011-4567-8901",
        contact: "Juan López",
    },
    SampleClient {
        name: "Decoración Interior BA",
        tax_id: "20-34567890-5",
        tax_condition: "Monotributista",
        address: "Calle 50 Nro 789",
        city: "La Plata",
        postal_code: "1900",
        email: "contacto@decoracionba.com.ar",
        phone: "0221-456-7890",
        contact: "María García",
    },
    SampleClient {
        name: "Construcciones Roca S.A.",
        tax_id: "30-98765432-1",
        tax_condition: "Responsable Inscripto",
        address: "Belgrano 456",
        city: "Quilmes",
        postal_code: "1878",
        email: "compras@construccionesroca.com",
        phone: "011-4253-1234",
        contact: "Carlos Roca",
    },
];

fn item(description: &str, quantity: i32, unit_price: i64) -> OrderItemInput {
    OrderItemInput {
        description: description.to_string(),
        quantity,
        unit_price: Decimal::from(unit_price),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let db_pool = config::connect(&config).await?;
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    let state = AppState::new(db_pool, &config);

    // --- Usuário administrador ---
    let username = env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string());
    let password = env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD deve ser definida")?;

    match state.auth_service.create_user(&username, &password).await {
        Ok(_) => tracing::info!("✅ Usuário admin criado ({})", username),
        Err(AppError::Conflict(_)) => tracing::info!("ℹ️  Usuário admin já existe"),
        Err(e) => return Err(anyhow::anyhow!("Falha ao criar o usuário admin: {e}")),
    }

    // --- Clientes e pedidos de exemplo ---
    let existing = state
        .client_service
        .list(None, None, PageRequest::new(Some(1), Some(1)))
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao contar clientes: {e}"))?;

    if existing.pagination.total > 0 {
        tracing::info!("ℹ️  Já existem dados de exemplo");
        return Ok(());
    }

    let mut client_ids = Vec::with_capacity(SAMPLE_CLIENTS.len());
    for sample in &SAMPLE_CLIENTS {
        let payload = ClientPayload {
            name: Some(sample.name.into()),
            tax_id: Some(sample.tax_id.into()),
            tax_condition: Some(sample.tax_condition.into()),
            fiscal_address: Some(sample.address.into()),
            city: Some(sample.city.into()),
            postal_code: Some(sample.postal_code.into()),
            email: Some(sample.email.into()),
            phone: Some(sample.phone.into()),
            contact: Some(sample.contact.into()),
            ..Default::default()
        };
        let client = state
            .client_service
            .create(payload)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar cliente de exemplo: {e}"))?;
        client_ids.push(client.id);
    }
    tracing::info!("✅ {} clientes de exemplo criados", client_ids.len());

    let now = Utc::now();
    let samples = [
        CreateOrderPayload {
            client_id: Some(client_ids[0]),
            ordered_at: Some(now),
            delivery_at: Some(now + Duration::days(7)),
            status: Some(OrderStatus::Pendiente),
            items: vec![
                item("Lámpara LED empotrable 18W", 20, 4500),
                item("Panel LED 60x60 40W", 10, 12000),
            ],
            notes: Some("Entrega en obra, Av. Mitre 890".into()),
        },
        CreateOrderPayload {
            client_id: Some(client_ids[1]),
            ordered_at: Some(now),
            delivery_at: Some(now + Duration::days(14)),
            status: Some(OrderStatus::EnProduccion),
            items: vec![
                item("Aplique de pared decorativo", 8, 8500),
                item("Colgante industrial vintage", 4, 15000),
                item("Tira LED RGB 5m", 6, 7200),
            ],
            notes: Some("Cliente solicita envío a domicilio".into()),
        },
    ];

    for payload in samples {
        let order = state
            .order_service
            .create(payload)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar pedido de exemplo: {e}"))?;
        tracing::info!("✅ Pedido {} criado (total {})", order.order.folio, order.order.total);
    }

    tracing::info!("🚀 Seed concluído com sucesso");
    Ok(())
}
