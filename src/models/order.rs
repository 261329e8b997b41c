// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, models::dates};

// --- Enums ---

// Mapeia o CREATE TYPE order_status do banco.
// Sem grafo de transição: qualquer estado pode ir para qualquer outro via update.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pendiente,
    EnProduccion,
    Listo,
    Entregado,
    Cobrado,
    Cancelado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pendiente,
        OrderStatus::EnProduccion,
        OrderStatus::Listo,
        OrderStatus::Entregado,
        OrderStatus::Cobrado,
        OrderStatus::Cancelado,
    ];

    /// Estados que tiram o pedido do contador "em andamento".
    pub const CLOSED: [OrderStatus; 3] = [
        OrderStatus::Entregado,
        OrderStatus::Cobrado,
        OrderStatus::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EnProduccion => "en_produccion",
            OrderStatus::Listo => "listo",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cobrado => "cobrado",
            OrderStatus::Cancelado => "cancelado",
        }
    }

    pub fn is_closed(&self) -> bool {
        Self::CLOSED.contains(self)
    }

    /// Filtro de listagem: ausente, vazio, `todos` ou `all` = qualquer estado.
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, AppError> {
        match raw.map(str::trim) {
            None | Some("") | Some("todos") | Some("all") => Ok(None),
            Some(value) => Self::ALL
                .into_iter()
                .find(|s| s.as_str() == value)
                .map(Some)
                .ok_or_else(|| AppError::BadRequest(format!("Estado inválido: {value}"))),
        }
    }
}

// --- Structs persistidas ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    #[serde(rename = "descripcion")]
    #[schema(example = "Lámpara LED empotrable 18W")]
    pub description: String,
    #[serde(rename = "cantidad")]
    #[schema(example = 20)]
    pub quantity: i32,
    #[serde(rename = "precio_unitario")]
    #[schema(example = 4500)]
    pub unit_price: Decimal,
    #[schema(example = 90000)]
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    #[schema(example = "PED-2026-0001")]
    pub folio: String,
    #[serde(rename = "cliente_id")]
    pub client_id: Uuid,
    #[serde(rename = "fecha_pedido")]
    pub ordered_at: DateTime<Utc>,
    #[serde(rename = "fecha_entrega")]
    pub delivery_at: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    // Subcoleção embutida: JSONB no Postgres
    #[sqlx(json)]
    pub items: Vec<OrderItem>,
    #[schema(example = 210000)]
    pub total: Decimal,
    #[serde(rename = "notas")]
    pub notes: String,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projeção somente-leitura do cliente referenciado.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientSummary {
    pub id: Uuid,
    #[serde(rename = "razon_social")]
    #[schema(example = "Electricidad López S.R.L.")]
    pub name: String,
    #[serde(rename = "cuit")]
    #[schema(example = "30-71234567-0")]
    pub tax_id: String,
}

/// Pedido + nome e CUIT do cliente. É o formato das listagens e do detalhe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    // `None` quando o cliente referenciado não existe mais (referência fraca)
    pub cliente: Option<ClientSummary>,
}

// --- Entradas ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("El precio unitario no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("La descripción es obligatoria.".into());
        return Err(err);
    }
    Ok(())
}

// Serialize exigido pelo `length` do validator em Vec<OrderItemInput>
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    #[serde(rename = "descripcion")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Panel LED 60x60 40W")]
    pub description: String,

    #[serde(rename = "cantidad")]
    #[validate(range(min = 1, message = "La cantidad debe ser al menos 1."))]
    #[schema(example = 10)]
    pub quantity: i32,

    #[serde(rename = "precio_unitario")]
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 12000)]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderPayload {
    #[serde(rename = "cliente_id")]
    #[validate(required(message = "El cliente es obligatorio."))]
    pub client_id: Option<Uuid>,

    #[serde(rename = "fecha_pedido", default, deserialize_with = "dates::deserialize_opt")]
    #[schema(value_type = Option<String>, example = "2026-10-19")]
    pub ordered_at: Option<DateTime<Utc>>,

    #[serde(rename = "fecha_entrega", default, deserialize_with = "dates::deserialize_opt")]
    #[schema(value_type = Option<String>, example = "2026-10-26")]
    pub delivery_at: Option<DateTime<Utc>>,

    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,

    #[serde(default)]
    #[validate(length(min = 1, message = "El pedido debe tener al menos un ítem."))]
    pub items: Vec<OrderItemInput>,

    #[serde(rename = "notas")]
    #[schema(example = "Entrega en obra, Av. Mitre 890")]
    pub notes: Option<String>,
}

// Update parcial: só os campos presentes são aplicados.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderPayload {
    #[serde(rename = "cliente_id")]
    pub client_id: Option<Uuid>,

    #[serde(rename = "fecha_pedido", default, deserialize_with = "dates::deserialize_opt")]
    #[schema(value_type = Option<String>, example = "2026-10-19")]
    pub ordered_at: Option<DateTime<Utc>>,

    // ausente = mantém; null ou "" = remove a data estimada
    #[serde(rename = "fecha_entrega", default, deserialize_with = "dates::deserialize_patch")]
    #[schema(value_type = Option<String>, example = "2026-10-26")]
    pub delivery_at: Option<Option<DateTime<Utc>>>,

    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,

    #[validate(length(min = 1, message = "El pedido debe tener al menos un ítem."))]
    pub items: Option<Vec<OrderItemInput>>,

    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

// --- Entradas já calculadas, entregues aos stores ---

/// Pedido pronto para persistir; o folio é atribuído pelo store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub ordered_at: DateTime<Utc>,
    pub delivery_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub notes: String,
}

/// Alterações de um update. `items` e `total` andam sempre juntos.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub client_id: Option<Uuid>,
    pub ordered_at: Option<DateTime<Utc>>,
    // Some(None) limpa a data
    pub delivery_at: Option<Option<DateTime<Utc>>>,
    pub status: Option<OrderStatus>,
    pub priced_items: Option<(Vec<OrderItem>, Decimal)>,
    pub notes: Option<String>,
}

impl OrderChanges {
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(client_id) = self.client_id {
            order.client_id = client_id;
        }
        if let Some(ordered_at) = self.ordered_at {
            order.ordered_at = ordered_at;
        }
        if let Some(delivery_at) = self.delivery_at {
            order.delivery_at = delivery_at;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some((items, total)) = &self.priced_items {
            order.items = items.clone();
            order.total = *total;
        }
        if let Some(notes) = &self.notes {
            order.notes = notes.clone();
        }
    }
}

/// Filtros da listagem de pedidos, já interpretados.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub active: crate::common::listing::ActiveFilter,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    // Mesma semântica do WHERE do Postgres; usada pelo store em memória.
    pub fn matches(&self, order: &Order) -> bool {
        use crate::common::listing::contains_ci;

        self.active.matches(order.active)
            && self.status.is_none_or(|s| s == order.status)
            && self.from.is_none_or(|from| order.ordered_at >= from)
            && self.to.is_none_or(|to| order.ordered_at <= to)
            && self.search.as_deref().is_none_or(|term| {
                contains_ci(&order.folio, term) || contains_ci(&order.notes, term)
            })
    }
}

// --- Dashboard ---

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderStats {
    #[serde(rename = "totalClientes")]
    pub active_clients: i64,
    #[serde(rename = "pedidosActivos")]
    pub orders_in_progress: i64,
    #[serde(rename = "pedidosMes")]
    pub orders_this_month: i64,
    #[serde(rename = "montoMes")]
    #[schema(example = 210000)]
    pub revenue_this_month: Decimal,
    // Estados sem pedidos ficam fora do mapa; o consumidor assume 0.
    #[serde(rename = "porEstado")]
    #[schema(value_type = Object)]
    pub by_status: std::collections::BTreeMap<OrderStatus, i64>,
    #[serde(rename = "recientes")]
    pub recent: Vec<OrderDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_snake_case() {
        let json = serde_json::to_value(OrderStatus::EnProduccion).unwrap();
        assert_eq!(json, json!("en_produccion"));
        for status in OrderStatus::ALL {
            assert_eq!(
                OrderStatus::parse_filter(Some(status.as_str())).unwrap(),
                Some(status)
            );
        }
    }

    #[test]
    fn status_filter_accepts_all_aliases() {
        assert_eq!(OrderStatus::parse_filter(None).unwrap(), None);
        assert_eq!(OrderStatus::parse_filter(Some("todos")).unwrap(), None);
        assert_eq!(OrderStatus::parse_filter(Some("all")).unwrap(), None);
        assert!(OrderStatus::parse_filter(Some("archivado")).is_err());
    }

    #[test]
    fn closed_statuses() {
        assert!(OrderStatus::Cobrado.is_closed());
        assert!(OrderStatus::Cancelado.is_closed());
        assert!(OrderStatus::Entregado.is_closed());
        assert!(!OrderStatus::Listo.is_closed());
        assert!(!OrderStatus::Pendiente.is_closed());
    }

    #[test]
    fn item_validation_rejects_bad_lines() {
        let ok = OrderItemInput {
            description: "Tira LED".into(),
            quantity: 1,
            unit_price: Decimal::ZERO,
        };
        assert!(ok.validate().is_ok());

        let blank = OrderItemInput { description: "  ".into(), ..ok.clone() };
        assert!(blank.validate().is_err());

        let zero_qty = OrderItemInput { quantity: 0, ..ok.clone() };
        assert!(zero_qty.validate().is_err());

        let negative = OrderItemInput { unit_price: Decimal::new(-1, 0), ..ok };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn create_payload_requires_client_and_items() {
        let payload: CreateOrderPayload = serde_json::from_value(json!({
            "items": []
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn stats_serialize_with_dashboard_keys() {
        let stats = OrderStats {
            active_clients: 3,
            orders_in_progress: 2,
            orders_this_month: 3,
            revenue_this_month: Decimal::new(90000, 0),
            by_status: [(OrderStatus::Cobrado, 1)].into_iter().collect(),
            recent: vec![],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalClientes"], 3);
        assert_eq!(json["porEstado"]["cobrado"], 1);
        assert_eq!(json["montoMes"].as_f64(), Some(90000.0));
        assert!(json["recientes"].as_array().unwrap().is_empty());
    }
}
