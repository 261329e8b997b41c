// Utilitários compartilhados pelos testes de integração.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bm_backend::{build_router, config::AppState};

pub const JWT_SECRET: &str = "segredo-dos-testes";
pub const USERNAME: &str = "bmilumina";
pub const PASSWORD: &str = "luces-2026";

/// Router completo sobre o store em memória, já com um usuário logado.
pub struct TestApp {
    pub router: Router,
    pub token: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let state = AppState::in_memory(JWT_SECRET);
        state
            .auth_service
            .create_user(USERNAME, PASSWORD)
            .await
            .expect("usuário de teste");

        let router = build_router(state, None);
        let mut app = TestApp { router, token: String::new() };

        let (status, body) = app
            .request_anon("POST", "/api/auth/login", Some(json!({"username": USERNAME, "password": PASSWORD})))
            .await;
        assert_eq!(status, StatusCode::OK, "login falhou: {body}");
        app.token = body["token"].as_str().expect("token").to_string();
        app
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.token)).await
    }

    pub async fn request_anon(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, None).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Cadastra um cliente e devolve o id.
    pub async fn create_client(&self, razon_social: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/clientes",
                Some(json!({"razon_social": razon_social, "cuit": "30-71234567-0"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Cria um pedido com os itens dados e devolve o corpo da resposta.
    pub async fn create_order(&self, client_id: &str, items: Value) -> Value {
        let (status, body) = self
            .request("POST", "/api/pedidos", Some(json!({"cliente_id": client_id, "items": items})))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}
