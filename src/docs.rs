// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::common::listing;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "BM Iluminación API", description = "Clientes, pedidos e dados da empresa"),
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::verify,

        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::list_all_active,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::deactivate_client,
        handlers::clients::reactivate_client,

        // --- Pedidos ---
        handlers::orders::list_orders,
        handlers::orders::get_stats,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::deactivate_order,
        handlers::orders::reactivate_order,

        // --- Empresa ---
        handlers::company::get_company,
        handlers::company::update_company,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::VerifyResponse,

            // --- Listagens ---
            listing::PageInfo,

            // --- Clientes ---
            models::client::Client,
            models::client::ClientPayload,
            handlers::clients::ClientActionResponse,

            // --- Pedidos ---
            models::order::OrderStatus,
            models::order::OrderItem,
            models::order::Order,
            models::order::ClientSummary,
            models::order::OrderDetail,
            models::order::OrderItemInput,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderPayload,
            models::order::OrderStats,
            handlers::orders::OrderActionResponse,

            // --- Empresa ---
            models::company::Company,
            models::company::UpdateCompanyPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e verificação de sessão"),
        (name = "Clientes", description = "Cadastro de clientes"),
        (name = "Pedidos", description = "Pedidos, folios e dashboard"),
        (name = "Empresa", description = "Dados fiscais da empresa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
