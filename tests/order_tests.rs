use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::*;

fn sample_items() -> Value {
    json!([
        {"descripcion": "Lámpara LED empotrable 18W", "cantidad": 20, "precio_unitario": 4500},
        {"descripcion": "Panel LED 60x60 40W", "cantidad": 10, "precio_unitario": 12000}
    ])
}

#[tokio::test]
async fn create_computes_subtotals_total_and_folio() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Electricidad López S.R.L.").await;

    let order = app.create_order(&client, sample_items()).await;

    assert_eq!(order["folio"], format!("PED-{}-0001", current_year()));
    assert_eq!(order["items"][0]["subtotal"], 90000.0);
    assert_eq!(order["items"][1]["subtotal"], 120000.0);
    assert_eq!(order["total"], 210000.0);
    assert_eq!(order["estado"], "pendiente");
    assert_eq!(order["activo"], true);
    assert_eq!(order["notas"], "");
    assert_eq!(order["cliente_id"], client.as_str());
    assert_eq!(order["cliente"]["razon_social"], "Electricidad López S.R.L.");
}

#[tokio::test]
async fn update_recomputes_items_and_keeps_folio() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Electricidad López S.R.L.").await;
    let order = app.create_order(&client, sample_items()).await;
    let id = order["id"].as_str().unwrap();

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/pedidos/{id}"),
            Some(json!({
                "items": [
                    {"descripcion": "Lámpara LED empotrable 18W", "cantidad": 25, "precio_unitario": 4500},
                    {"descripcion": "Panel LED 60x60 40W", "cantidad": 10, "precio_unitario": 12000}
                ],
                "estado": "en_produccion"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["folio"], order["folio"]);
    assert_eq!(updated["items"][0]["subtotal"], 112500.0);
    assert_eq!(updated["total"], 232500.0);
    assert_eq!(updated["estado"], "en_produccion");
}

#[tokio::test]
async fn folios_are_contiguous_within_the_year() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    let year = current_year();

    for expected in 1..=4 {
        let order = app
            .create_order(&client, json!([{"descripcion": "Tira LED", "cantidad": 1, "precio_unitario": 10}]))
            .await;
        assert_eq!(order["folio"], format!("PED-{year}-{expected:04}"));
    }
}

#[tokio::test]
async fn invalid_orders_are_rejected() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;

    let cases = [
        json!({"items": [{"descripcion": "x", "cantidad": 1, "precio_unitario": 1}]}),
        json!({"cliente_id": client, "items": []}),
        json!({"cliente_id": client, "items": [{"descripcion": "", "cantidad": 1, "precio_unitario": 1}]}),
        json!({"cliente_id": client, "items": [{"descripcion": "x", "cantidad": 0, "precio_unitario": 1}]}),
        json!({"cliente_id": client, "items": [{"descripcion": "x", "cantidad": 1, "precio_unitario": -1}]}),
        json!({"cliente_id": client, "estado": "archivado", "items": [{"descripcion": "x", "cantidad": 1, "precio_unitario": 1}]}),
    ];

    for payload in cases {
        let (status, body) = app.request("POST", "/api/pedidos", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["error"].is_string(), "{body}");
    }

    // Nada foi gravado
    let (_, list) = app.request("GET", "/api/pedidos", None).await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[tokio::test]
async fn soft_delete_hides_from_active_listing_and_reactivate_is_idempotent() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    let order = app.create_order(&client, sample_items()).await;
    let id = order["id"].as_str().unwrap();

    let (status, body) = app.request("DELETE", &format!("/api/pedidos/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pedido desactivado");
    assert_eq!(body["pedido"]["activo"], false);

    let (_, active) = app.request("GET", "/api/pedidos?activo=true", None).await;
    assert_eq!(active["pagination"]["total"], 0);

    let (_, inactive) = app.request("GET", "/api/pedidos?activo=false", None).await;
    assert_eq!(inactive["pagination"]["total"], 1);

    let (status, fetched) = app.request("GET", &format!("/api/pedidos/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["activo"], false);

    for _ in 0..2 {
        let (status, body) = app.request("PATCH", &format!("/api/pedidos/{id}/reactivar"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Pedido reactivado");
        assert_eq!(body["pedido"]["activo"], true);
        assert_eq!(body["pedido"]["folio"], order["folio"]);
    }
}

#[tokio::test]
async fn list_filters_by_search_status_and_dates() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;

    let first = app.create_order(&client, sample_items()).await;
    let (status, _) = app
        .request(
            "POST",
            "/api/pedidos",
            Some(json!({
                "cliente_id": client,
                "fecha_pedido": "2025-03-10",
                "estado": "cobrado",
                "notas": "Entrega en obra, Av. Mitre 890",
                "items": [{"descripcion": "Colgante vintage", "cantidad": 4, "precio_unitario": 15000}]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, by_note) = app.request("GET", "/api/pedidos?search=MITRE", None).await;
    assert_eq!(by_note["pagination"]["total"], 1);
    assert_eq!(by_note["data"][0]["estado"], "cobrado");

    let folio = first["folio"].as_str().unwrap();
    let (_, by_folio) = app.request("GET", &format!("/api/pedidos?search={folio}"), None).await;
    assert_eq!(by_folio["pagination"]["total"], 1);

    let (_, cobrados) = app.request("GET", "/api/pedidos?estado=cobrado", None).await;
    assert_eq!(cobrados["pagination"]["total"], 1);

    let (_, todos) = app.request("GET", "/api/pedidos?estado=todos", None).await;
    assert_eq!(todos["pagination"]["total"], 2);

    let (_, march) = app
        .request("GET", "/api/pedidos?fecha_desde=2025-03-01&fecha_hasta=2025-03-10", None)
        .await;
    assert_eq!(march["pagination"]["total"], 1);
    assert_eq!(march["data"][0]["cliente"]["razon_social"], "Iluminar SRL");

    let (_, before) = app.request("GET", "/api/pedidos?fecha_hasta=2025-03-09", None).await;
    assert_eq!(before["pagination"]["total"], 0);

    let (status, _) = app.request("GET", "/api/pedidos?estado=archivado", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pagination_reports_page_count() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    for _ in 0..3 {
        app.create_order(&client, json!([{"descripcion": "Plafón", "cantidad": 1, "precio_unitario": 100}]))
            .await;
    }

    let (_, page) = app.request("GET", "/api/pedidos?page=2&limit=2", None).await;
    assert_eq!(page["pagination"], json!({"total": 3, "page": 2, "limit": 2, "pages": 2}));
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["folio"], format!("PED-{}-0001", current_year()));
}

#[tokio::test]
async fn stats_summarise_active_orders() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    app.create_client("Otro Cliente").await;

    let a = app.create_order(&client, sample_items()).await;
    let b = app
        .create_order(&client, json!([{"descripcion": "Aplique", "cantidad": 8, "precio_unitario": 8500}]))
        .await;
    let c = app
        .create_order(&client, json!([{"descripcion": "Tira LED", "cantidad": 6, "precio_unitario": 7200}]))
        .await;

    let b_id = b["id"].as_str().unwrap();
    let c_id = c["id"].as_str().unwrap();
    app.request("PUT", &format!("/api/pedidos/{b_id}"), Some(json!({"estado": "cobrado"})))
        .await;
    app.request("DELETE", &format!("/api/pedidos/{c_id}"), None).await;

    let (status, stats) = app.request("GET", "/api/pedidos/stats", None).await;
    assert_eq!(status, StatusCode::OK, "{stats}");
    assert_eq!(stats["totalClientes"], 2);
    assert_eq!(stats["pedidosActivos"], 1);
    assert_eq!(stats["pedidosMes"], 2);
    assert_eq!(stats["montoMes"], 68000.0);
    assert_eq!(stats["porEstado"], json!({"pendiente": 1, "cobrado": 1}));

    let recent = stats["recientes"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["id"], b["id"]);
    assert_eq!(recent[1]["id"], a["id"]);
    assert_eq!(recent[0]["cliente"]["razon_social"], "Iluminar SRL");
}

#[tokio::test]
async fn unknown_order_is_404() {
    let app = TestApp::spawn().await;
    let missing = uuid::Uuid::new_v4();

    for (method, uri) in [
        ("GET", format!("/api/pedidos/{missing}")),
        ("DELETE", format!("/api/pedidos/{missing}")),
        ("PATCH", format!("/api/pedidos/{missing}/reactivar")),
    ] {
        let (status, body) = app.request(method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "Pedido no encontrado");
    }

    let (status, _) = app
        .request("PUT", &format!("/api/pedidos/{missing}"), Some(json!({"notas": "x"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_without_crashing() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;

    let cases = [
        // cantidad × precio estoura o Decimal
        json!([{"descripcion": "Reflector", "cantidad": 1000, "precio_unitario": 1e26}]),
        // cada subtotal cabe no Decimal, a soma não
        json!([
            {"descripcion": "a", "cantidad": 1, "precio_unitario": 5e28},
            {"descripcion": "b", "cantidad": 1, "precio_unitario": 5e28}
        ]),
        // acima de NUMERIC(14, 2)
        json!([{"descripcion": "Tablero", "cantidad": 2, "precio_unitario": 600000000000u64}]),
    ];

    for items in cases {
        let (status, body) = app
            .request("POST", "/api/pedidos", Some(json!({"cliente_id": client, "items": items.clone()})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{items} -> {body}");
        assert!(body["error"].is_string(), "{body}");
    }

    let order = app.create_order(&client, sample_items()).await;
    let id = order["id"].as_str().unwrap();
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/pedidos/{id}"),
            Some(json!({"items": [{"descripcion": "Reflector", "cantidad": 1000, "precio_unitario": 1e26}]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app.request("GET", &format!("/api/pedidos/{id}"), None).await;
    assert_eq!(fetched["total"], 210000.0);
}

#[tokio::test]
async fn page_far_beyond_the_end_is_empty() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    app.create_order(&client, sample_items()).await;

    let (status, body) = app
        .request("GET", "/api/pedidos?page=9223372036854775807&limit=100", None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_unique_contiguous_folios() {
    let app = std::sync::Arc::new(TestApp::spawn().await);
    let client = app.create_client("Iluminar SRL").await;
    let total = 20;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..total {
        let app = app.clone();
        let client = client.clone();
        tasks.spawn(async move {
            app.create_order(&client, json!([{"descripcion": "Dicroica", "cantidad": 1, "precio_unitario": 10}]))
                .await["folio"]
                .as_str()
                .unwrap()
                .to_string()
        });
    }

    let mut folios = Vec::new();
    while let Some(folio) = tasks.join_next().await {
        folios.push(folio.unwrap());
    }
    folios.sort();

    let year = current_year();
    let expected: Vec<String> = (1..=total).map(|n| format!("PED-{year}-{n:04}")).collect();
    assert_eq!(folios, expected);
}

#[tokio::test]
async fn delivery_date_can_be_cleared() {
    let app = TestApp::spawn().await;
    let client = app.create_client("Iluminar SRL").await;
    let (status, order) = app
        .request(
            "POST",
            "/api/pedidos",
            Some(json!({"cliente_id": client, "fecha_entrega": "2026-11-02T15:00:00Z", "items": sample_items()})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert!(order["fecha_entrega"].is_string());
    let id = order["id"].as_str().unwrap();

    // campo ausente mantém a data
    let (_, kept) = app
        .request("PUT", &format!("/api/pedidos/{id}"), Some(json!({"notas": "llamar antes"})))
        .await;
    assert_eq!(kept["fecha_entrega"], order["fecha_entrega"]);

    for cleared in [json!(""), Value::Null] {
        app.request(
            "PUT",
            &format!("/api/pedidos/{id}"),
            Some(json!({"fecha_entrega": "2026-11-05T15:00:00Z"})),
        )
        .await;
        let (status, updated) = app
            .request("PUT", &format!("/api/pedidos/{id}"), Some(json!({"fecha_entrega": cleared})))
            .await;
        assert_eq!(status, StatusCode::OK, "{updated}");
        assert!(updated["fecha_entrega"].is_null(), "{updated}");
    }
}
